use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A calendar date as entered by the user.
///
/// Accepted forms: `YYYY`, `YYYY-MM`, `YYYY-MM-DD` and RFC 3339 timestamps.
/// Coarse forms resolve to the first day of the year or month.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventDate(pub String);

impl EventDate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parse(&self) -> CoreResult<NaiveDate> {
        let raw = self.0.trim();
        let invalid = || CoreError::InvalidDate {
            raw: self.0.clone(),
        };

        // four unsigned year digits for every full-date form
        if raw.len() >= 10 && raw.get(..4).and_then(digits::<u32>).is_none() {
            return Err(invalid());
        }

        match raw.len() {
            4 => {
                let year = digits::<i32>(raw).ok_or_else(invalid)?;
                NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)
            }
            7 => {
                let (y, m) = raw.split_once('-').ok_or_else(invalid)?;
                let year = digits::<i32>(y).ok_or_else(invalid)?;
                let month = digits::<u32>(m).ok_or_else(invalid)?;
                NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
            }
            10 => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid()),
            _ => DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.date_naive())
                .map_err(|_| invalid()),
        }
    }

    /// Year and year-month dates are shown as written.
    pub fn label(&self) -> String {
        let raw = self.0.trim();
        match self.parse() {
            Ok(_) if raw.len() == 4 || raw.len() == 7 => raw.to_string(),
            Ok(date) => date.format("%Y-%m-%d").to_string(),
            Err(_) => self.0.clone(),
        }
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventDate {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

fn digits<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_each_granularity() {
        assert_eq!(EventDate::from("1789").parse(), Ok(ymd(1789, 1, 1)));
        assert_eq!(EventDate::from("1789-07").parse(), Ok(ymd(1789, 7, 1)));
        assert_eq!(EventDate::from("1789-07-14").parse(), Ok(ymd(1789, 7, 14)));
        assert_eq!(
            EventDate::from("1991-08-06T12:00:00Z").parse(),
            Ok(ymd(1991, 8, 6))
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        for raw in [
            "",
            "17a9",
            "1789-13",
            "1789-02-30",
            "July 1789",
            "-500",
            "-500-01-01",
            "+789-07-14",
            "-0500-01-01T00:00:00Z",
        ] {
            let err = EventDate::from(raw).parse().unwrap_err();
            assert_eq!(
                err,
                CoreError::InvalidDate {
                    raw: raw.to_string()
                }
            );
        }
    }

    #[test]
    fn label_keeps_coarse_forms() {
        assert_eq!(EventDate::from("1440").label(), "1440");
        assert_eq!(EventDate::from("1929-10").label(), "1929-10");
        assert_eq!(EventDate::from("1953-04-25").label(), "1953-04-25");
        assert_eq!(EventDate::from("soon").label(), "soon");
    }
}
