use time::{
    format_description::FormatItem,
    macros::{format_description, offset},
    OffsetDateTime, PrimitiveDateTime, UtcOffset,
};

/// The durable representation always uses this offset so that files written
/// on one machine parse identically on another.
pub const CANONICAL_OFFSET: UtcOffset = offset!(+8);

const FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Current time at second resolution in the canonical offset.
///
/// # Panics
/// This function should never panic
#[must_use]
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
        .to_offset(CANONICAL_OFFSET)
        .replace_nanosecond(0)
        .expect("zero is a valid nanosecond")
}

#[must_use]
pub fn format(timestamp: OffsetDateTime) -> String {
    timestamp.to_offset(CANONICAL_OFFSET).format(FORMAT).unwrap_or_default()
}

/// # Errors
pub fn parse(input: &str) -> Result<OffsetDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(input, FORMAT).map(|dt| dt.assume_offset(CANONICAL_OFFSET))
}

/// Timestamp rendered with characters that are safe in a file name.
#[must_use]
pub fn file_label(timestamp: OffsetDateTime) -> String {
    format(timestamp).replace(':', "-").replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    #[test]
    fn test_format() {
        let timestamp = datetime!(2024-01-01 10:00:00 +8);
        assert_eq!(super::format(timestamp), "2024-01-01 10:00:00");
    }

    #[test]
    fn test_format_normalizes_offset() {
        let timestamp = datetime!(2024-01-01 02:00:00 UTC);
        assert_eq!(super::format(timestamp), "2024-01-01 10:00:00");
    }

    #[test]
    fn test_parse() {
        let timestamp = super::parse("2024-01-01 10:00:00").unwrap();
        assert_eq!(timestamp, datetime!(2024-01-01 10:00:00 +8));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(super::parse("not a timestamp").is_err());
        assert!(super::parse("").is_err());
        assert!(super::parse("2024-01-01").is_err());
    }

    #[test]
    fn test_round_trip() {
        let rendered = "2024-06-30 23:59:59";
        let timestamp = super::parse(rendered).unwrap();
        assert_eq!(super::format(timestamp), rendered);
    }

    #[test]
    fn test_file_label() {
        let timestamp = datetime!(2024-01-01 10:20:30 +8);
        assert_eq!(super::file_label(timestamp), "2024-01-01_10-20-30");
    }

    #[test]
    fn test_now_has_second_resolution() {
        let timestamp = super::now();
        assert_eq!(timestamp.nanosecond(), 0);
        assert_eq!(timestamp.offset(), super::CANONICAL_OFFSET);
    }
}
