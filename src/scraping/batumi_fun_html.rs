use once_cell::sync::Lazy;

use super::profile::{
    default_termination, selector, FieldSelectors, SiteLocation, SiteProfile, SiteTimezone,
};

const URL: &str = "https://batumi.fun/events/list/";
const SITE_ID: &str = "batumi_fun";
const SITE_NAME: &str = "batumi.fun";

// The Events Calendar list view.
static SELECTORS: Lazy<FieldSelectors> = Lazy::new(|| FieldSelectors {
    marker: selector("header.tribe-events-header"),
    event: selector("div.tribe-events-calendar-list__event-row"),
    title: selector("h3.tribe-events-calendar-list__event-title"),
    link: selector("h3.tribe-events-calendar-list__event-title a"),
    datetime: selector("time.tribe-events-calendar-list__event-datetime"),
    description: selector("div.tribe-events-calendar-list__event-description"),
    address: selector("address.tribe-events-calendar-list__event-venue"),
    address_part: selector("span"),
    image: selector("div.tribe-events-calendar-list__event-featured-image-wrapper img"),
    price: selector("span.tribe-events-c-small-cta__price"),
});

pub fn profile() -> SiteProfile {
    SiteProfile {
        id: SITE_ID,
        name: SITE_NAME,
        route: "batumifun",
        base_url: URL,
        batch_size: 10,
        max_batches: 4,
        selectors: &SELECTORS,
        location: SiteLocation {
            country: "Georgia",
            city: "Batumi",
        },
        timezone: SiteTimezone {
            tz: chrono_tz::Asia::Tbilisi,
            name: "GET",
            offset: "UTC +4",
        },
        is_terminal: default_termination(),
    }
}
