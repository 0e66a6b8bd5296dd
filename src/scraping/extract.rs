use chrono::{NaiveTime, Utc};
use scraper::{ElementRef, Selector};

use super::base;
use super::diagnostics::{DatePart, Diagnostic, Diagnostics};
use super::profile::SiteProfile;
use crate::models::{EventRecord, Location, RECORD_KIND};

/// Pulls fields out of one event fragment. A missing field is reported and
/// left as `None`; it never drops the record.
pub struct FieldExtractor<'a> {
    profile: &'a SiteProfile,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(profile: &'a SiteProfile, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            profile,
            diagnostics,
        }
    }

    pub fn extract(&self, event: &ElementRef<'_>) -> EventRecord {
        let selectors = self.profile.selectors;
        let location = Location {
            country: self.profile.location.country.to_string(),
            city: self.profile.location.city.to_string(),
            address: self.address(event),
        };

        EventRecord {
            id: None,
            kind: RECORD_KIND.to_string(),
            source: self.profile.name.to_string(),
            title: self.text(event, &selectors.title, "title"),
            description: self.text(event, &selectors.description, "description"),
            occurs_at: self.occurs_at(event),
            duration_in_seconds: None,
            location,
            image_url: self.attr(event, &selectors.image, "src", "image"),
            price: self.price(event),
            timezone: self.profile.timezone.info(),
            url: self.attr(event, &selectors.link, "href", "url"),
        }
    }

    fn text(
        &self,
        event: &ElementRef<'_>,
        selector: &Selector,
        field: &'static str,
    ) -> Option<String> {
        let node = match base::first_node(event, selector) {
            Some(node) => node,
            None => return self.missing(field),
        };
        base::non_empty(base::inner_text(node))
    }

    fn attr(
        &self,
        event: &ElementRef<'_>,
        selector: &Selector,
        attr: &str,
        field: &'static str,
    ) -> Option<String> {
        if base::first_node(event, selector).is_none() {
            return self.missing(field);
        }
        let value = base::first_attr(event, selector, attr);
        if value.is_none() {
            self.report_missing(field);
        }
        value
    }

    fn address(&self, event: &ElementRef<'_>) -> Option<String> {
        let selectors = self.profile.selectors;
        let node = match base::first_node(event, &selectors.address) {
            Some(node) => node,
            None => return self.missing("address"),
        };
        let parts = node
            .select(&selectors.address_part)
            .map(base::inner_text)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>();
        if parts.is_empty() {
            base::non_empty(base::inner_text(node))
        } else {
            Some(parts.join(", "))
        }
    }

    fn occurs_at(&self, event: &ElementRef<'_>) -> Option<i64> {
        let node = match base::first_node(event, &self.profile.selectors.datetime) {
            Some(node) => node,
            None => return self.missing("datetime"),
        };

        let time = match base::find_clock_time(&base::inner_text(node)) {
            Some(time) => time,
            None => {
                self.report_default(DatePart::Time);
                NaiveTime::MIN
            }
        };

        let date = node.value().attr("datetime").and_then(base::parse_iso_date);
        let date = match date {
            Some(date) => date,
            None => {
                self.report_default(DatePart::Date);
                return Some(0);
            }
        };

        let local = base::to_timezone_datetime(date, time, self.profile.timezone.tz);
        match local {
            Some(dt) => Some(dt.with_timezone(&Utc).timestamp()),
            None => {
                // Local time skipped by a DST jump.
                self.report_default(DatePart::Time);
                base::to_timezone_datetime(date, NaiveTime::MIN, self.profile.timezone.tz)
                    .map(|dt| dt.timestamp())
                    .or(Some(0))
            }
        }
    }

    fn price(&self, event: &ElementRef<'_>) -> Option<String> {
        base::first_text(event, &self.profile.selectors.price)
            .and_then(|text| base::strip_currency(&text))
    }

    fn missing<T>(&self, field: &'static str) -> Option<T> {
        self.report_missing(field);
        None
    }

    fn report_missing(&self, field: &'static str) {
        self.diagnostics.report(Diagnostic::FieldMissing {
            site: self.profile.id.to_string(),
            field,
        });
    }

    fn report_default(&self, part: DatePart) {
        self.diagnostics.report(Diagnostic::DateDefaulted {
            site: self.profile.id.to_string(),
            part,
        });
    }
}
