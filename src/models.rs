use serde::{Deserialize, Serialize};

/// Schema tag for the current record shape.
pub const RECORD_KIND: &str = "parsed_v1";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: Option<String>, // identity is deferred, always null for now
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "parserName")]
    pub source: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub occurs_at: Option<i64>, // epoch seconds, 0 when the date was unreadable
    pub duration_in_seconds: Option<i64>,
    pub location: Location,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub timezone: SiteTimezoneInfo,
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub country: String,
    pub city: String,
    pub address: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteTimezoneInfo {
    pub timezone_name: String,
    pub timezone_offset: String,
}

/// Envelope returned by every read endpoint.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Envelope<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_missing_fields_as_null() {
        let record = EventRecord {
            id: None,
            kind: RECORD_KIND.to_string(),
            source: "batumi.fun".to_string(),
            title: Some("Jazz Night".to_string()),
            description: None,
            occurs_at: None,
            duration_in_seconds: None,
            location: Location {
                country: "Georgia".to_string(),
                city: "Batumi".to_string(),
                address: None,
            },
            image_url: None,
            price: None,
            timezone: SiteTimezoneInfo {
                timezone_name: "GET".to_string(),
                timezone_offset: "UTC +4".to_string(),
            },
            url: None,
        };

        let value = serde_json::to_value(&record).expect("serialize record");
        assert_eq!(
            value,
            json!({
                "id": null,
                "type": "parsed_v1",
                "parserName": "batumi.fun",
                "title": "Jazz Night",
                "description": null,
                "occursAt": null,
                "durationInSeconds": null,
                "location": {"country": "Georgia", "city": "Batumi", "address": null},
                "imageUrl": null,
                "price": null,
                "timezone": {"timezoneName": "GET", "timezoneOffset": "UTC +4"},
                "url": null
            })
        );
    }

    #[test]
    fn error_envelope_omits_data() {
        let value = serde_json::to_value(Envelope::<Vec<EventRecord>>::error("boom"))
            .expect("serialize envelope");
        assert_eq!(value, json!({"status": "error", "message": "boom"}));
    }
}
