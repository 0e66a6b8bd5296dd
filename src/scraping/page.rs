use scraper::Html;

use super::diagnostics::Diagnostics;
use super::extract::FieldExtractor;
use super::profile::SiteProfile;
use crate::models::EventRecord;

/// The page did not carry the site's template marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("template marker not found, page layout has changed or the page is invalid")]
pub struct TemplateDrift;

/// Parses one listing page into records, in document order.
///
/// An empty vector means the marker was found but the page lists no events,
/// which is the normal end of a listing.
pub fn parse_page(
    profile: &SiteProfile,
    html: &str,
    diagnostics: &dyn Diagnostics,
) -> Result<Vec<EventRecord>, TemplateDrift> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    if root.select(&profile.selectors.marker).next().is_none() {
        return Err(TemplateDrift);
    }

    let extractor = FieldExtractor::new(profile, diagnostics);
    Ok(root
        .select(&profile.selectors.event)
        .map(|event| extractor.extract(&event))
        .collect())
}
