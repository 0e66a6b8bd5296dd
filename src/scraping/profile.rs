use chrono_tz::Tz;
use reqwest::Url;
use scraper::Selector;

use super::pipeline::{any_empty_page, TerminationPolicy};
use super::ScrapeError;
use crate::config::ConfigError;
use crate::models::SiteTimezoneInfo;

/// Selectors for one site's listing template. Field selectors are
/// evaluated relative to a single event fragment.
pub struct FieldSelectors {
    pub marker: Selector,
    pub event: Selector,
    pub title: Selector,
    pub link: Selector,
    pub datetime: Selector,
    pub description: Selector,
    pub address: Selector,
    pub address_part: Selector,
    pub image: Selector,
    pub price: Selector,
}

#[derive(Debug, Clone, Copy)]
pub struct SiteTimezone {
    pub tz: Tz,
    pub name: &'static str,
    pub offset: &'static str,
}

impl SiteTimezone {
    pub fn info(&self) -> SiteTimezoneInfo {
        SiteTimezoneInfo {
            timezone_name: self.name.to_string(),
            timezone_offset: self.offset.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SiteLocation {
    pub country: &'static str,
    pub city: &'static str,
}

/// Everything that differs between two listing sites.
#[derive(Clone)]
pub struct SiteProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub route: &'static str,
    pub base_url: &'static str,
    pub batch_size: u32,
    pub max_batches: u32,
    pub selectors: &'static FieldSelectors,
    pub location: SiteLocation,
    pub timezone: SiteTimezone,
    pub is_terminal: TerminationPolicy,
}

impl SiteProfile {
    pub fn page_url(&self, page: u32) -> Result<String, ScrapeError> {
        let base = Url::parse(self.base_url).map_err(|err| ScrapeError::BaseUrl {
            site: self.id.to_string(),
            reason: err.to_string(),
        })?;
        let url = base
            .join(&format!("page/{page}/"))
            .map_err(|err| ScrapeError::BaseUrl {
                site: self.id.to_string(),
                reason: err.to_string(),
            })?;
        Ok(url.into())
    }

    pub fn with_paging(mut self, batch_size: u32, max_batches: u32) -> Result<Self, ConfigError> {
        if batch_size == 0 {
            return Err(ConfigError::Invalid {
                key: "batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if max_batches == 0 {
            return Err(ConfigError::Invalid {
                key: "max_batches",
                reason: "must be at least 1".to_string(),
            });
        }
        self.batch_size = batch_size;
        self.max_batches = max_batches;
        Ok(self)
    }

    pub fn with_termination(mut self, policy: TerminationPolicy) -> Self {
        self.is_terminal = policy;
        self
    }
}

pub(crate) fn default_termination() -> TerminationPolicy {
    any_empty_page
}

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|err| panic!("invalid selector {css:?}: {err:?}"))
}
