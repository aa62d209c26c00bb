//! Time-of-day wire format.
//!
//! The API writes `HH:MM` when seconds are zero and `HH:MM:SS` otherwise, so
//! both are accepted. Output is always `HH:MM:SS`.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

pub(crate) fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&time.format("%H:%M:%S").to_string())
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn parse(raw: &str) -> Result<NaiveTime, String> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|e| format!("invalid time of day '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minutes_and_seconds_precision() {
        assert_eq!(parse("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(parse("09:30:15").unwrap(), NaiveTime::from_hms_opt(9, 30, 15).unwrap());
        assert!(parse("9h30").is_err());
    }
}
