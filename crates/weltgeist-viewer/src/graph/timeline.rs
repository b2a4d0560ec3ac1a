use chrono::NaiveDate;
use weltgeist_core::{CoreError, CoreResult, EventDate};

/// Visible span of the horizontal date axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(1400, 1, 1).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MAX),
        }
    }
}

impl TimeWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if start >= end {
            return Err(CoreError::InvalidTimeRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses the toolbar's range fields; any event date form is accepted ("1400", "1789-07").
    pub fn parse(start: &str, end: &str) -> CoreResult<Self> {
        let s = EventDate::from(start).parse()?;
        let e = EventDate::from(end).parse()?;
        Self::new(s, e)
    }

    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Linear position of `date` in the window, clamped to `0.0..=1.0`.
    pub fn fraction(&self, date: NaiveDate) -> f32 {
        let span = self.span_days();
        if span <= 0 {
            return 0.0;
        }
        let offset = (date - self.start).num_days();
        (offset as f64 / span as f64).clamp(0.0, 1.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_window_spans_1400_to_2025() {
        let w = TimeWindow::default();
        assert_eq!(w.start, ymd(1400, 1, 1));
        assert_eq!(w.end, ymd(2025, 1, 1));
        assert_eq!(w.fraction(w.start), 0.0);
        assert_eq!(w.fraction(w.end), 1.0);
    }

    #[test]
    fn fraction_clamps_outside_dates() {
        let w = TimeWindow::default();
        assert_eq!(w.fraction(ymd(1066, 10, 14)), 0.0);
        assert_eq!(w.fraction(ymd(2100, 1, 1)), 1.0);
        assert!(!w.contains(ymd(2100, 1, 1)));
    }

    #[test]
    fn midpoint_maps_to_half() {
        let w = TimeWindow::new(ymd(1900, 1, 1), ymd(1900, 1, 11)).unwrap();
        assert!((w.fraction(ymd(1900, 1, 6)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn parse_accepts_years_and_rejects_inverted_range() {
        let w = TimeWindow::parse("1700", "1800").unwrap();
        assert_eq!(w.start, ymd(1700, 1, 1));
        assert!(matches!(
            TimeWindow::parse("1800", "1700"),
            Err(CoreError::InvalidTimeRange { .. })
        ));
        assert!(matches!(
            TimeWindow::parse("17th c.", "1800"),
            Err(CoreError::InvalidDate { .. })
        ));
    }
}
