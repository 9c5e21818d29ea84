//! Display formatting for package fields.

use chrono::{DateTime, Local, Utc};

/// Weight with one decimal and unit, e.g. `"2.5 kg"`.
pub fn weight(kg: f64) -> String {
    format!("{kg:.1} kg")
}

/// Arrival timestamp in the viewer's local time, minute precision.
pub fn arrival(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn weight_has_one_decimal() {
        assert_eq!(weight(2.0), "2.0 kg");
        assert_eq!(weight(0.75), "0.8 kg");
    }

    #[test]
    fn arrival_is_minute_precision() {
        let at: DateTime<Utc> = "2024-03-01T09:30:45Z".parse().unwrap();
        let formatted = arrival(at);
        assert!(formatted.contains("2024-03-0"), "got: {formatted}");
        assert_eq!(formatted.len(), "2024-03-01 09:30".len());
    }
}
