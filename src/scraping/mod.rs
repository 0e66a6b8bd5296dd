pub mod base;
pub mod batumi_fun_html;
pub mod belgrad_consult_html;
pub mod diagnostics;
pub mod extract;
pub mod fetch;
pub mod page;
pub mod pipeline;
pub mod profile;

use diagnostics::Diagnostics;
use fetch::{PageFetcher, RetryPolicy};
use pipeline::Pipeline;
use profile::SiteProfile;

use crate::models::EventRecord;

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("unknown site id: {0}")]
    UnknownSite(String),
    #[error("bad listing url for {site}: {reason}")]
    BaseUrl { site: String, reason: String },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct SiteInfo {
    pub id: String,
    pub name: String,
    pub url: String,
    pub route: String,
}

impl From<&SiteProfile> for SiteInfo {
    fn from(profile: &SiteProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            name: profile.name.to_string(),
            url: profile.base_url.to_string(),
            route: profile.route.to_string(),
        }
    }
}

pub fn active_sites() -> Vec<SiteProfile> {
    vec![batumi_fun_html::profile(), belgrad_consult_html::profile()]
}

pub fn list_sites() -> Vec<SiteInfo> {
    active_sites().iter().map(SiteInfo::from).collect()
}

pub fn find_site(id: &str) -> Option<SiteProfile> {
    active_sites().into_iter().find(|site| site.id == id)
}

pub async fn run_single<F>(
    id: &str,
    fetcher: &F,
    diagnostics: &dyn Diagnostics,
    retry: RetryPolicy,
) -> Result<Vec<EventRecord>, ScrapeError>
where
    F: PageFetcher + ?Sized,
{
    let profile = find_site(id).ok_or_else(|| ScrapeError::UnknownSite(id.to_string()))?;
    Pipeline::new(&profile, fetcher, diagnostics)
        .with_retry(retry)
        .run()
        .await
}
