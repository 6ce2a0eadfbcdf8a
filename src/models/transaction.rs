use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One recorded expense. Field names on disk are fixed by the data file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "data", with = "iso_timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "valor", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "recorrente", default)]
    pub recurring: bool,
}

impl Transaction {
    /// A transaction stamped with the current local time.
    pub fn new(amount: Decimal, category: String, description: String, recurring: bool) -> Self {
        Self::at(
            Local::now().naive_local(),
            amount,
            category,
            description,
            recurring,
        )
    }

    pub fn at(
        timestamp: NaiveDateTime,
        amount: Decimal,
        category: String,
        description: String,
        recurring: bool,
    ) -> Self {
        Self {
            timestamp,
            amount,
            category,
            description,
            recurring,
        }
    }
}

/// Parse an ISO-8601 timestamp as written by this program or by older data files.
///
/// Naive date-times are taken as local wall-clock time. Offset-bearing values are
/// converted to local time. A bare date means midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = raw.parse::<NaiveDateTime>() {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Local).naive_local());
    }
    raw.parse::<NaiveDate>()
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub(crate) fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

mod iso_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}
