//! Rate-limit strings such as `"15/min"` or `"100/hour,1000/day"`.
//!
//! The schema stores these verbatim; this module only checks and explains
//! them.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitError {
    #[error("empty rate limit")]
    Empty,

    #[error("rate limit `{piece}` is missing `/` between count and unit")]
    MissingSlash { piece: String },

    #[error("invalid request count in rate limit `{piece}`")]
    InvalidCount { piece: String },

    #[error("rate limit `{piece}` must allow at least one request")]
    ZeroCount { piece: String },

    #[error("unknown time unit `{unit}` (expected s/min/hour/day/month/year)")]
    UnknownUnit { unit: String },
}

/// Window a rate limit counts requests over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatePeriod {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl RatePeriod {
    /// Window length. Months count as 30 days, years as 365.
    #[must_use]
    pub fn seconds(self) -> u64 {
        match self {
            Self::Second => 1,
            Self::Minute => 60,
            Self::Hour => 3_600,
            Self::Day => 86_400,
            Self::Month => 30 * 86_400,
            Self::Year => 365 * 86_400,
        }
    }

    fn from_unit(unit: &str) -> Option<Self> {
        let period = match unit.to_ascii_lowercase().as_str() {
            "s" | "sec" | "second" | "seconds" => Self::Second,
            "m" | "min" | "minute" | "minutes" => Self::Minute,
            "h" | "hour" | "hours" => Self::Hour,
            "d" | "day" | "days" => Self::Day,
            "month" | "months" => Self::Month,
            "y" | "year" | "years" => Self::Year,
            _ => return None,
        };
        Some(period)
    }

    fn canonical_unit(self) -> &'static str {
        match self {
            Self::Second => "s",
            Self::Minute => "min",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub count: u64,
    pub period: RatePeriod,
}

impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.count, self.period.canonical_unit())
    }
}

/// Parse a comma-separated list of `<count>/<unit>` limits, keeping their
/// order.
pub fn parse_rate_limits(input: &str) -> Result<Vec<RateLimit>, RateLimitError> {
    if input.trim().is_empty() {
        return Err(RateLimitError::Empty);
    }
    input.split(',').map(|piece| parse_one(piece.trim())).collect()
}

fn parse_one(piece: &str) -> Result<RateLimit, RateLimitError> {
    if piece.is_empty() {
        return Err(RateLimitError::Empty);
    }
    let Some((count, unit)) = piece.split_once('/') else {
        return Err(RateLimitError::MissingSlash {
            piece: piece.to_owned(),
        });
    };
    let count: u64 = count
        .trim()
        .parse()
        .map_err(|_| RateLimitError::InvalidCount {
            piece: piece.to_owned(),
        })?;
    if count == 0 {
        return Err(RateLimitError::ZeroCount {
            piece: piece.to_owned(),
        });
    }
    let unit = unit.trim();
    let period = RatePeriod::from_unit(unit).ok_or_else(|| RateLimitError::UnknownUnit {
        unit: unit.to_owned(),
    })?;
    Ok(RateLimit { count, period })
}
