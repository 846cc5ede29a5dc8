//! Display formatting shared by every view

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

/// Placeholder for absent values and unresolved references
pub const NOT_AVAILABLE: &str = "N/A";

/// `HH:MM`, or [`NOT_AVAILABLE`] when absent
pub fn time_hm(time: Option<&NaiveTime>) -> String {
    time.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `HH:MM - HH:MM`
pub fn time_range(entry: &NaiveTime, exit: &NaiveTime) -> String {
    format!("{} - {}", time_hm(Some(entry)), time_hm(Some(exit)))
}

/// `YYYY-MM-DD`
pub fn date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Two decimal places
pub fn salary(amount: &Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_truncates_seconds() {
        let t = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(time_hm(Some(&t)), "08:00");
        let t = NaiveTime::from_hms_opt(17, 0, 59).unwrap();
        assert_eq!(time_hm(Some(&t)), "17:00");
        assert_eq!(time_hm(None), "N/A");
    }

    #[test]
    fn test_range_and_date() {
        let entry = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let exit = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
        assert_eq!(time_range(&entry, &exit), "08:00 - 17:00");
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(date(&d), "2024-03-01");
    }

    #[test]
    fn test_salary_two_decimals() {
        assert_eq!(salary(&Decimal::new(3000, 0)), "3000.00");
        assert_eq!(salary(&Decimal::new(350055, 2)), "3500.55");
        assert_eq!(salary(&Decimal::ZERO), "0.00");
    }
}
