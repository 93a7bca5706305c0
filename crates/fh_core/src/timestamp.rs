//! Normalization of the free-form timestamp strings carried by articles.
//!
//! Parsers are tried in a fixed order; the first success wins. Anything that
//! no parser accepts maps to [`epoch_floor`], so parsing never fails.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `2024-01-03T10:00:00Z`, `2024-01-03T10:00:00+09:00`
    Rfc3339,
    /// ISO-8601 with an offset lacking the colon, e.g. `+0900`
    IsoOffset,
    /// ISO-8601 without any zone, read as UTC
    IsoNaive,
    /// `2024-01-03 10:00:00`, read as UTC
    SpaceSeparated,
    /// `Wed, 03 Jan 2024 10:00:00 GMT`
    Rfc2822,
    /// `2024-01-03`, midnight UTC
    DateOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    Parsed {
        instant: DateTime<Utc>,
        format: TimestampFormat,
    },
    Unparsed,
}

impl ParsedTimestamp {
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            ParsedTimestamp::Parsed { instant, .. } => *instant,
            ParsedTimestamp::Unparsed => epoch_floor(),
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, ParsedTimestamp::Parsed { .. })
    }
}

type Parser = fn(&str) -> Option<DateTime<Utc>>;

const PARSERS: &[(TimestampFormat, Parser)] = &[
    (TimestampFormat::Rfc3339, parse_rfc3339),
    (TimestampFormat::IsoOffset, parse_iso_offset),
    (TimestampFormat::IsoNaive, parse_iso_naive),
    (TimestampFormat::SpaceSeparated, parse_space_separated),
    (TimestampFormat::Rfc2822, parse_rfc2822),
    (TimestampFormat::DateOnly, parse_date_only),
];

fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.with_timezone(&Utc))
}

fn parse_iso_offset(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_iso_naive(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc())
}

fn parse_space_separated(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}

fn parse_rfc2822(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(s).ok().map(|dt| dt.with_timezone(&Utc))
}

fn parse_date_only(s: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// The instant unparseable timestamps collapse to: the oldest possible.
pub fn epoch_floor() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

pub fn parse_timestamp(input: &str) -> ParsedTimestamp {
    let input = input.trim();
    if input.is_empty() {
        return ParsedTimestamp::Unparsed;
    }
    PARSERS
        .iter()
        .find_map(|(format, parse)| {
            parse(input).map(|instant| ParsedTimestamp::Parsed {
                instant,
                format: *format,
            })
        })
        .unwrap_or(ParsedTimestamp::Unparsed)
}

pub fn normalize_timestamp(input: &str) -> DateTime<Utc> {
    parse_timestamp(input).instant()
}

/// The first of `candidates` that parses, or the epoch floor.
pub fn first_valid<'a>(candidates: impl IntoIterator<Item = &'a str>) -> DateTime<Utc> {
    candidates
        .into_iter()
        .map(parse_timestamp)
        .find(ParsedTimestamp::is_parsed)
        .map_or_else(epoch_floor, |p| p.instant())
}

/// Current time in the form every stage writes.
pub fn now_rfc3339() -> String {
    to_rfc3339(Utc::now())
}

pub fn to_rfc3339(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jan3() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 3, 10, 0, 0).unwrap()
    }

    fn format_of(input: &str) -> Option<TimestampFormat> {
        match parse_timestamp(input) {
            ParsedTimestamp::Parsed { format, .. } => Some(format),
            ParsedTimestamp::Unparsed => None,
        }
    }

    #[test]
    fn test_rfc3339_with_z() {
        assert_eq!(normalize_timestamp("2024-01-03T10:00:00Z"), jan3());
        assert_eq!(format_of("2024-01-03T10:00:00Z"), Some(TimestampFormat::Rfc3339));
    }

    #[test]
    fn test_rfc3339_with_offset() {
        assert_eq!(normalize_timestamp("2024-01-03T19:00:00+09:00"), jan3());
    }

    #[test]
    fn test_iso_offset_without_colon() {
        assert_eq!(normalize_timestamp("2024-01-03T19:00:00+0900"), jan3());
        assert_eq!(format_of("2024-01-03T19:00:00+0900"), Some(TimestampFormat::IsoOffset));
    }

    #[test]
    fn test_iso_naive() {
        assert_eq!(normalize_timestamp("2024-01-03T10:00:00"), jan3());
        assert_eq!(
            normalize_timestamp("2024-01-03T10:00:00.123456"),
            jan3() + chrono::Duration::microseconds(123_456)
        );
        assert_eq!(format_of("2024-01-03T10:00:00"), Some(TimestampFormat::IsoNaive));
    }

    #[test]
    fn test_space_separated() {
        assert_eq!(normalize_timestamp("2024-01-03 10:00:00"), jan3());
    }

    #[test]
    fn test_rfc2822() {
        assert_eq!(normalize_timestamp("Wed, 03 Jan 2024 10:00:00 GMT"), jan3());
        assert_eq!(normalize_timestamp("Wed, 03 Jan 2024 19:00:00 +0900"), jan3());
        assert_eq!(
            format_of("Wed, 03 Jan 2024 10:00:00 +0000"),
            Some(TimestampFormat::Rfc2822)
        );
    }

    #[test]
    fn test_date_only() {
        assert_eq!(
            normalize_timestamp("2024-01-03"),
            Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_garbage_maps_to_epoch_floor() {
        for input in ["", "   ", "yesterday", "2024-13-45T99:00:00Z", "不明"] {
            assert_eq!(normalize_timestamp(input), epoch_floor(), "input: {:?}", input);
            assert!(!parse_timestamp(input).is_parsed());
        }
    }

    #[test]
    fn test_first_valid_skips_unparseable() {
        assert_eq!(first_valid(["", "nonsense", "2024-01-03T10:00:00Z"]), jan3());
        assert_eq!(first_valid(["", "nonsense"]), epoch_floor());
    }
}
