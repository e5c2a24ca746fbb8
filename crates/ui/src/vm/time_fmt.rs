use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

/// Formats an attempt time, or a dash when the service did not record one.
#[must_use]
pub fn format_taken_at(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), format_datetime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn formats_to_minutes() {
        assert_eq!(format_datetime(fixed_now()), "2023-11-14 22:13");
        assert_eq!(format_taken_at(None), "-");
    }
}
