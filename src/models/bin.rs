//! The waste bin record and the request payloads that shape it.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A tracked waste bin.
///
/// Serializes with camelCase keys, identically over HTTP and in the data
/// file. Every field is required when parsing stored records; a data file
/// with missing or mistyped keys is treated as corrupt by the store.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WasteBin {
    /// Server-assigned identifier, unique within the collection and
    /// immutable once assigned.
    pub id: i64,

    /// Human-readable free text describing where the bin stands.
    pub location: String,

    /// How full the bin is, as an integer percentage. Clamped to [0, 100]
    /// on update only; creation stores the supplied value as-is.
    pub fill_level: i64,

    /// Whether the bin is flagged for pickup.
    pub needs_collection: bool,

    /// ISO-8601 UTC timestamp of the last create or update, set by the
    /// server.
    pub last_updated: String,
}

/// Body of `POST /bins`.
///
/// The server assigns `id` and `lastUpdated`; any such keys in the request
/// body are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBin {
    pub location: String,
    pub fill_level: Option<i64>,
    pub needs_collection: Option<bool>,
}

/// Body of `PUT /bins/{id}`. Absent fields leave the record untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBin {
    pub location: Option<String>,
    pub fill_level: Option<i64>,
    pub needs_collection: Option<bool>,
}

/// Current UTC time as an ISO-8601 string with millisecond precision and a
/// literal `Z` suffix, e.g. `2025-11-03T09:41:27.512Z`.
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_serializes_with_camel_case_keys() {
        let bin = WasteBin {
            id: 7,
            location: "Dock B".into(),
            fill_level: 42,
            needs_collection: true,
            last_updated: "2025-11-03T09:41:27.512Z".into(),
        };

        let json = serde_json::to_string(&bin).unwrap();
        assert!(json.contains("\"fillLevel\":42"));
        assert!(json.contains("\"needsCollection\":true"));
        assert!(json.contains("\"lastUpdated\":\"2025-11-03T09:41:27.512Z\""));
    }

    #[test]
    fn update_payload_accepts_any_subset_of_fields() {
        let empty: UpdateBin = serde_json::from_str("{}").unwrap();
        assert!(empty.location.is_none());
        assert!(empty.fill_level.is_none());
        assert!(empty.needs_collection.is_none());

        let partial: UpdateBin = serde_json::from_str(r#"{"fillLevel": 55}"#).unwrap();
        assert_eq!(partial.fill_level, Some(55));
        assert!(partial.location.is_none());
    }

    #[test]
    fn create_payload_ignores_server_owned_keys() {
        let payload: CreateBin = serde_json::from_str(
            r#"{"id": 99, "location": "Main St", "lastUpdated": "bogus"}"#,
        )
        .unwrap();
        assert_eq!(payload.location, "Main St");
        assert!(payload.fill_level.is_none());
    }

    #[test]
    fn timestamps_are_rfc3339_with_millis_and_z() {
        let ts = current_timestamp();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());

        // Exactly three fractional digits before the Z.
        let fraction = ts.rsplit('.').next().unwrap();
        assert_eq!(fraction.len(), 4, "unexpected timestamp tail in {ts}");
    }
}
