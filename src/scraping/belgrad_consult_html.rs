use once_cell::sync::Lazy;

use super::profile::{
    default_termination, selector, FieldSelectors, SiteLocation, SiteProfile, SiteTimezone,
};

const URL: &str = "https://belgrad-consult.com/events/list/";
const SITE_ID: &str = "belgrad_consult";
const SITE_NAME: &str = "belgrad-consult.com";

static SELECTORS: Lazy<FieldSelectors> = Lazy::new(|| FieldSelectors {
    marker: selector("div.tribe-events-header"),
    event: selector("div.tribe-events-calendar-list__event-row"),
    title: selector("h3.tribe-events-calendar-list__event-title"),
    link: selector("a.tribe-events-calendar-list__event-title-link"),
    datetime: selector("time.tribe-events-calendar-list__event-datetime"),
    description: selector("div.tribe-events-calendar-list__event-description"),
    address: selector("address.tribe-events-calendar-list__event-venue"),
    address_part: selector("span"),
    image: selector("img.tribe-events-calendar-list__event-featured-image"),
    price: selector("span.tribe-events-c-small-cta__price"),
});

pub fn profile() -> SiteProfile {
    SiteProfile {
        id: SITE_ID,
        name: SITE_NAME,
        route: "belgrad_consult_com",
        base_url: URL,
        batch_size: 10,
        max_batches: 4,
        selectors: &SELECTORS,
        location: SiteLocation {
            country: "Serbia",
            city: "Belgrade",
        },
        timezone: SiteTimezone {
            tz: chrono_tz::Europe::Belgrade,
            name: "CET",
            offset: "UTC +1",
        },
        is_terminal: default_termination(),
    }
}
