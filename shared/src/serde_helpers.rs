//! Serde helpers for time-of-day columns
//!
//! The store returns `time` columns as `HH:MM:SS` (sometimes with a
//! fractional part); forms send `HH:MM`. Both are accepted, and values are
//! always written back with second precision.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

const WIRE_FORMAT: &str = "%H:%M:%S";

/// Parse `HH:MM:SS[.f]` or `HH:MM`
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Required time-of-day column
pub mod time_of_day {
    use super::*;

    pub fn serialize<S>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&time.format(WIRE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        parse_time(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day: {raw}")))
    }
}

/// Nullable time-of-day column
pub mod option_time_of_day {
    use super::*;

    pub fn serialize<S>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => s.serialize_str(&t.format(WIRE_FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_time(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day: {raw}"))),
        }
    }
}

/// Deserialize a numeric column that treats null as zero
pub fn decimal_or_zero<'de, D>(deserializer: D) -> Result<rust_decimal::Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<rust_decimal::Decimal>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// Patch field where an explicit `null` means "clear"
///
/// Use with `#[serde(default)]`: an absent field stays `None`, a present
/// `null` becomes `Some(None)`.
pub fn present_or_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Row {
        #[serde(with = "time_of_day")]
        at: NaiveTime,
        #[serde(default, with = "option_time_of_day")]
        maybe: Option<NaiveTime>,
    }

    #[test]
    fn test_parse_both_precisions() {
        let hm = parse_time("08:00").unwrap();
        let hms = parse_time("08:00:00").unwrap();
        assert_eq!(hm, hms);
        assert_eq!(
            parse_time("17:30:15.250").unwrap().format("%H:%M").to_string(),
            "17:30"
        );
        assert!(parse_time("8 o'clock").is_none());
    }

    #[test]
    fn test_roundtrip_writes_seconds() {
        let row: Row = serde_json::from_str(r#"{"at":"08:15","maybe":null}"#).unwrap();
        assert!(row.maybe.is_none());
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"at":"08:15:00","maybe":null}"#);
    }

    #[test]
    fn test_missing_optional_is_none() {
        let row: Row = serde_json::from_str(r#"{"at":"23:59:59"}"#).unwrap();
        assert!(row.maybe.is_none());
    }

    #[derive(Debug, Deserialize)]
    struct Salary {
        #[serde(default, deserialize_with = "decimal_or_zero")]
        amount: rust_decimal::Decimal,
    }

    #[test]
    fn test_decimal_null_is_zero() {
        let s: Salary = serde_json::from_str(r#"{"amount":null}"#).unwrap();
        assert!(s.amount.is_zero());
        let s: Salary = serde_json::from_str(r#"{}"#).unwrap();
        assert!(s.amount.is_zero());
        let s: Salary = serde_json::from_str(r#"{"amount":3000.5}"#).unwrap();
        assert_eq!(s.amount, rust_decimal::Decimal::new(30005, 1));
    }

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "present_or_null")]
        note: Option<Option<String>>,
    }

    #[test]
    fn test_present_null_clears() {
        let p: Patch = serde_json::from_str(r#"{"note":null}"#).unwrap();
        assert_eq!(p.note, Some(None));
        let p: Patch = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.note, None);
        let p: Patch = serde_json::from_str(r#"{"note":"hi"}"#).unwrap();
        assert_eq!(p.note, Some(Some("hi".to_string())));
    }
}
