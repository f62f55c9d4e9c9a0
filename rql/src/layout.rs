//! Time layouts for time-typed fields.
//!
//! A layout is either one of the well known names below or a chrono strftime pattern. Patterns are
//! checked once when the schema is built: a sample timestamp formatted with the pattern has to parse
//! back with it.
//!
//! Zone abbreviations (`%Z`, as in `UnixDate`) are accepted but not resolved, so those times are
//! taken as UTC.

use chrono::format::{self, Item, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset, TimeZone};

use crate::error::SchemaError;

const NAMED: &[(&str, &str)] = &[
    ("ANSIC", "%a %b %e %H:%M:%S %Y"),
    ("UnixDate", "%a %b %e %H:%M:%S %Z %Y"),
    ("RubyDate", "%a %b %d %H:%M:%S %z %Y"),
    ("RFC822", "%d %b %y %H:%M %Z"),
    ("RFC822Z", "%d %b %y %H:%M %z"),
    ("RFC850", "%A, %d-%b-%y %H:%M:%S %Z"),
    ("RFC1123", "%a, %d %b %Y %H:%M:%S %Z"),
    ("RFC1123Z", "%a, %d %b %Y %H:%M:%S %z"),
    ("Kitchen", "%I:%M%p"),
    ("Stamp", "%b %e %H:%M:%S"),
    ("StampMilli", "%b %e %H:%M:%S%.3f"),
    ("StampMicro", "%b %e %H:%M:%S%.6f"),
    ("StampNano", "%b %e %H:%M:%S%.9f"),
    ("DateTime", "%Y-%m-%d %H:%M:%S"),
    ("DateOnly", "%Y-%m-%d"),
    ("TimeOnly", "%H:%M:%S"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Layout {
    #[default]
    Rfc3339,
    Rfc2822,
    Pattern(String),
}

impl Layout {
    /// Resolve a layout name or pattern, checking that patterns round-trip.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let layout = match text {
            "RFC3339" | "RFC3339Nano" => return Ok(Layout::Rfc3339),
            "RFC2822" => return Ok(Layout::Rfc2822),
            _ => match NAMED.iter().find(|(name, _)| *name == text) {
                Some((_, pattern)) => Layout::Pattern((*pattern).to_owned()),
                None => Layout::Pattern(text.to_owned()),
            },
        };
        layout.check()?;
        Ok(layout)
    }

    /// Parse `input` according to this layout. A missing offset is taken as UTC, a missing time as
    /// midnight, a missing year as year 0 and a missing date as 0000-01-01.
    pub fn parse_time(&self, input: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        let pattern = match self {
            Layout::Rfc3339 => return DateTime::parse_from_rfc3339(input),
            Layout::Rfc2822 => return DateTime::parse_from_rfc2822(input),
            Layout::Pattern(pattern) => pattern.as_str(),
        };
        let mut parsed = Parsed::new();
        format::parse(&mut parsed, input, StrftimeItems::new(pattern))?;
        if parsed.timestamp().is_none() {
            fill_defaults(&mut parsed)?;
        }
        parsed.to_datetime()
    }

    fn check(&self) -> Result<(), SchemaError> {
        let Layout::Pattern(pattern) = self else { return Ok(()) };
        let invalid = |reason: String| SchemaError::InvalidLayout { layout: pattern.clone(), reason };

        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(invalid("invalid format specifier".to_owned()));
        }
        if !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Numeric(..) | Item::Fixed(..))) {
            return Err(invalid("no date or time fields".to_owned()));
        }
        let sample = FixedOffset::west_opt(7 * 3600)
            .and_then(|offset| offset.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).single())
            .ok_or_else(|| invalid("no sample time".to_owned()))?;
        let formatted = sample.format(pattern).to_string();
        self.parse_time(&formatted).map(|_| ()).map_err(|err| invalid(err.to_string()))
    }
}

fn fill_defaults(parsed: &mut Parsed) -> Result<(), chrono::ParseError> {
    let has_year = parsed.year().is_some()
        || parsed.year_div_100().is_some()
        || parsed.year_mod_100().is_some()
        || parsed.isoyear().is_some();
    if !has_year {
        parsed.set_year(0)?;
        if parsed.month().is_none() && parsed.ordinal().is_none() {
            parsed.set_month(1)?;
            parsed.set_day(1)?;
        }
    }
    if parsed.hour_div_12().is_none() && parsed.hour_mod_12().is_none() {
        parsed.set_hour(0)?;
        parsed.set_minute(0)?;
    }
    if parsed.offset().is_none() {
        parsed.set_offset(0)?;
    }
    Ok(())
}
