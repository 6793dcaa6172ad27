//! Decoding of EDM primitive literals into typed values.
//!
//! Decode rules are part of the interoperability contract: each literal is
//! parsed strictly under its declared kind, and a literal that does not parse
//! fails the whole record it belongs to.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Timelike};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ResolveError;
use crate::model::{Literal, PrimitiveKind};

/// A decoded EDM primitive value.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    String(String),
    Int64(i64),
    Boolean(bool),
    Double(f64),
    /// Kept as an arbitrary-precision JSON number so the literal's digits
    /// survive serialization unchanged.
    Decimal(serde_json::Number),
    TimeOfDay(NaiveTime),
    Date(NaiveDate),
    Duration(Duration),
    DateTimeOffset(DateTime<FixedOffset>),
    Guid(Uuid),
}

/// Decode a literal under its declared primitive kind.
///
/// # Errors
///
/// Returns `ResolveError::InvalidLiteral` when the text does not parse under
/// the declared kind. Callers propagate this; it is never coerced to a default.
pub fn decode(kind: PrimitiveKind, literal: &str) -> Result<PrimitiveValue, ResolveError> {
    let invalid = || ResolveError::InvalidLiteral {
        kind: kind.name().to_string(),
        value: literal.to_string(),
    };

    match kind {
        PrimitiveKind::String => Ok(PrimitiveValue::String(literal.to_string())),
        PrimitiveKind::Int64 => literal
            .parse::<i64>()
            .map(PrimitiveValue::Int64)
            .map_err(|_| invalid()),
        // Only the exact `true`/`false` tokens are valid booleans.
        PrimitiveKind::Boolean => match literal {
            "true" => Ok(PrimitiveValue::Boolean(true)),
            "false" => Ok(PrimitiveValue::Boolean(false)),
            _ => Err(invalid()),
        },
        PrimitiveKind::Double => literal
            .parse::<f64>()
            .map(PrimitiveValue::Double)
            .map_err(|_| invalid()),
        PrimitiveKind::Decimal => literal
            .parse::<serde_json::Number>()
            .map(PrimitiveValue::Decimal)
            .map_err(|_| invalid()),
        PrimitiveKind::TimeOfDay => literal
            .parse::<NaiveTime>()
            .map(PrimitiveValue::TimeOfDay)
            .map_err(|_| invalid()),
        PrimitiveKind::Date => literal
            .parse::<NaiveDate>()
            .map(PrimitiveValue::Date)
            .map_err(|_| invalid()),
        PrimitiveKind::Duration => parse_iso_duration(literal)
            .map(PrimitiveValue::Duration)
            .ok_or_else(invalid),
        PrimitiveKind::DateTimeOffset => DateTime::parse_from_rfc3339(literal)
            .map(PrimitiveValue::DateTimeOffset)
            .map_err(|_| invalid()),
        PrimitiveKind::Guid => Uuid::parse_str(literal)
            .map(PrimitiveValue::Guid)
            .map_err(|_| invalid()),
    }
}

/// Decode a literal expression.
///
/// # Errors
///
/// Same as [`decode`].
pub fn decode_literal(literal: &Literal) -> Result<PrimitiveValue, ResolveError> {
    decode(literal.kind, &literal.value)
}

impl PrimitiveValue {
    /// Render the value into the output document.
    ///
    /// Rendering is deterministic: dates as `YYYY-MM-DD`, times with
    /// millisecond precision, timestamps in round-trip format, durations back
    /// to ISO-8601, GUIDs lowercase dashed.
    pub fn to_json(&self) -> Value {
        match self {
            PrimitiveValue::String(s) => Value::String(s.clone()),
            PrimitiveValue::Int64(i) => Value::from(*i),
            PrimitiveValue::Boolean(b) => Value::Bool(*b),
            PrimitiveValue::Double(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                // INF / NaN have no JSON number form
                .unwrap_or_else(|| Value::String(f.to_string())),
            PrimitiveValue::Decimal(n) => Value::Number(n.clone()),
            PrimitiveValue::TimeOfDay(t) => Value::String(t.format("%H:%M:%S%.3f").to_string()),
            PrimitiveValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            PrimitiveValue::Duration(d) => Value::String(format_iso_duration(d)),
            PrimitiveValue::DateTimeOffset(dt) => Value::String(format_timestamp(dt)),
            PrimitiveValue::Guid(g) => Value::String(g.to_string()),
        }
    }
}

/// Format a timestamp in round-trip form with seven fractional digits and an
/// explicit offset (`2020-01-01T00:00:00.0000000+00:00`).
///
/// The seven-digit fraction is pinned for byte-compatibility with existing
/// consumers of the deprecation extension.
pub fn format_timestamp(dt: &DateTime<FixedOffset>) -> String {
    let ticks = (dt.nanosecond() % 1_000_000_000) / 100;
    format!(
        "{}.{:07}{}",
        dt.format("%Y-%m-%dT%H:%M:%S"),
        ticks,
        dt.format("%:z")
    )
}

/// Parse an ISO-8601 day/time duration: `-?P[nD][T[nH][nM][n[.f]S]]`.
///
/// Returns `None` on any malformed input, including a bare `P` or a trailing
/// `T` with no components.
pub fn parse_iso_duration(text: &str) -> Option<Duration> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, text),
    };
    let rest = rest.strip_prefix('P')?;
    if rest.is_empty() {
        return None;
    }

    let (date_part, time_part) = match rest.split_once('T') {
        Some((_, "")) => return None,
        Some((d, t)) => (d, Some(t)),
        None => (rest, None),
    };

    let mut total = Duration::zero();

    if !date_part.is_empty() {
        let days: i64 = date_part.strip_suffix('D')?.parse().ok()?;
        total = total.checked_add(&Duration::try_days(days)?)?;
    }

    if let Some(mut rest) = time_part {
        // Components must appear in H, M, S order, each at most once.
        let mut seen = 0u8;
        while !rest.is_empty() {
            let split = rest.find(|c: char| !c.is_ascii_digit() && c != '.')?;
            let (number, tail) = rest.split_at(split);
            let unit = tail.chars().next()?;
            rest = &tail[1..];

            let component = match unit {
                'H' if seen < 1 => {
                    seen = 1;
                    Duration::try_hours(number.parse().ok()?)?
                }
                'M' if seen < 2 => {
                    seen = 2;
                    Duration::try_minutes(number.parse().ok()?)?
                }
                'S' if seen < 3 => {
                    seen = 3;
                    parse_seconds(number)?
                }
                _ => return None,
            };
            total = total.checked_add(&component)?;
        }
    }

    Some(if negative { -total } else { total })
}

fn parse_seconds(number: &str) -> Option<Duration> {
    let (whole, fraction) = match number.split_once('.') {
        Some((w, f)) => (w, f),
        None => (number, ""),
    };
    let seconds = Duration::try_seconds(whole.parse().ok()?)?;
    if fraction.is_empty() {
        return Some(seconds);
    }
    if fraction.len() > 9 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let nanos: i64 = format!("{:0<9}", fraction).parse().ok()?;
    seconds.checked_add(&Duration::nanoseconds(nanos))
}

/// Render a duration back to canonical ISO-8601 (`PT0S` for zero).
pub fn format_iso_duration(duration: &Duration) -> String {
    let negative = *duration < Duration::zero();
    let d = if negative { -*duration } else { *duration };

    let total_seconds = d.num_seconds();
    let nanos = (d - Duration::seconds(total_seconds))
        .num_nanoseconds()
        .unwrap_or(0);

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let mut out = String::from(if negative { "-P" } else { "P" });
    if days > 0 {
        out.push_str(&format!("{}D", days));
    }

    let has_time = hours > 0 || minutes > 0 || seconds > 0 || nanos > 0;
    if has_time || days == 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{}H", hours));
        }
        if minutes > 0 {
            out.push_str(&format!("{}M", minutes));
        }
        if nanos > 0 {
            let fraction = format!("{:09}", nanos);
            out.push_str(&format!("{}.{}S", seconds, fraction.trim_end_matches('0')));
        } else if seconds > 0 || !has_time {
            out.push_str(&format!("{}S", seconds));
        }
    }

    out
}
