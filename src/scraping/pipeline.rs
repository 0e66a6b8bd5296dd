use std::ops::RangeInclusive;

use futures::future::join_all;
use tracing::info;

use super::diagnostics::{Diagnostic, Diagnostics};
use super::fetch::{fetch_with_retry, FetchError, PageFetcher, RetryPolicy};
use super::page::parse_page;
use super::profile::SiteProfile;
use super::ScrapeError;
use crate::models::EventRecord;

/// Decides from a finished wave whether the listing has run out.
pub type TerminationPolicy = fn(&[PageResult]) -> bool;

#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Events(Vec<EventRecord>),
    TemplateDrift,
    Unreachable(FetchError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub page: u32,
    pub outcome: PageOutcome,
}

impl PageResult {
    pub fn event_count(&self) -> usize {
        match &self.outcome {
            PageOutcome::Events(events) => events.len(),
            _ => 0,
        }
    }

    pub fn into_events(self) -> Vec<EventRecord> {
        match self.outcome {
            PageOutcome::Events(events) => events,
            _ => Vec::new(),
        }
    }
}

/// The listing has no "last page" marker, so the first page in a wave that
/// yields nothing (empty, drifted or unreachable) ends the run.
pub fn any_empty_page(wave: &[PageResult]) -> bool {
    wave.iter().any(|page| page.event_count() == 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Running { iteration: u32 },
    Done(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    ListingEnd,
    BatchLimit,
}

/// Pages covered by wave `iteration` (0-based), 1-based and inclusive.
pub fn wave_pages(iteration: u32, batch_size: u32) -> RangeInclusive<u32> {
    let start = iteration * batch_size + 1;
    let end = (iteration + 1) * batch_size;
    start..=end
}

pub struct Pipeline<'a, F: PageFetcher + ?Sized> {
    profile: &'a SiteProfile,
    fetcher: &'a F,
    diagnostics: &'a dyn Diagnostics,
    retry: RetryPolicy,
}

impl<'a, F: PageFetcher + ?Sized> Pipeline<'a, F> {
    pub fn new(profile: &'a SiteProfile, fetcher: &'a F, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            profile,
            fetcher,
            diagnostics,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Runs waves until the listing ends or `max_batches` is reached and
    /// returns every event in page order.
    pub async fn run(&self) -> Result<Vec<EventRecord>, ScrapeError> {
        let profile = self.profile;
        let mut events = Vec::new();
        let mut pages_fetched = 0usize;
        let mut state = PipelineState::Running { iteration: 0 };

        while let PipelineState::Running { iteration } = state {
            let pages = wave_pages(iteration, profile.batch_size);
            info!(
                site = profile.id,
                iteration,
                "Scraping pages {}-{}",
                pages.start(),
                pages.end()
            );

            let wave = self.run_wave(pages).await?;
            pages_fetched += wave.len();

            let listing_ended = (profile.is_terminal)(&wave);
            let limit_reached = iteration + 1 >= profile.max_batches;

            let before = events.len();
            for page in wave {
                events.extend(page.into_events());
            }
            info!(
                site = profile.id,
                iteration,
                wave_events = events.len() - before,
                total_events = events.len(),
                "Wave complete"
            );

            state = if listing_ended {
                PipelineState::Done(StopReason::ListingEnd)
            } else if limit_reached {
                PipelineState::Done(StopReason::BatchLimit)
            } else {
                PipelineState::Running {
                    iteration: iteration + 1,
                }
            };
        }

        info!(
            site = profile.id,
            pages_fetched,
            events = events.len(),
            stop = ?state,
            "Scrape finished"
        );
        Ok(events)
    }

    /// Fetches and parses every page of one wave concurrently. Results come
    /// back in page order whatever order the fetches finish in.
    async fn run_wave(&self, pages: RangeInclusive<u32>) -> Result<Vec<PageResult>, ScrapeError> {
        let urls = pages
            .map(|page| self.profile.page_url(page).map(|url| (page, url)))
            .collect::<Result<Vec<_>, _>>()?;

        let tasks = urls
            .iter()
            .map(|(page, url)| self.handle_page(*page, url));
        Ok(join_all(tasks).await)
    }

    async fn handle_page(&self, page: u32, url: &str) -> PageResult {
        let site = self.profile.id;
        let outcome = match fetch_with_retry(self.fetcher, url, self.retry).await {
            Ok(html) => match parse_page(self.profile, &html, self.diagnostics) {
                Ok(events) => PageOutcome::Events(events),
                Err(_) => {
                    self.diagnostics.report(Diagnostic::TemplateDrift {
                        site: site.to_string(),
                        page,
                    });
                    PageOutcome::TemplateDrift
                }
            },
            Err((err, attempts)) => {
                self.diagnostics.report(Diagnostic::FetchFailed {
                    site: site.to_string(),
                    page,
                    error: err.to_string(),
                    attempts,
                });
                PageOutcome::Unreachable(err)
            }
        };
        PageResult { page, outcome }
    }
}
