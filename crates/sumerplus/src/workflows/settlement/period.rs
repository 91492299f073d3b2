use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// Inclusive date range a settlement statement covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WorkPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Monday through Sunday of the week containing `today`.
    pub fn week_of(today: NaiveDate) -> Self {
        let start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// Reads `MM.DD.YY-MM.DD.YY` (also `MM.DD.YYYY`, or `MM.DD` in the current year). Spaces are
    /// ignored.
    pub fn parse(text: &str, today: NaiveDate) -> Option<Self> {
        let compact: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
        let (start, end) = compact.split_once(['-', '–'])?;
        let start = parse_period_date(start, today)?;
        let end = parse_period_date(end, today)?;
        (start <= end).then_some(Self { start, end })
    }

    /// Period from the first `Week` cell, else from the sheet name, else the current week.
    pub fn resolve(week_cell: Option<&str>, sheet_name: &str, today: NaiveDate) -> Self {
        week_cell
            .and_then(|cell| Self::parse(cell, today))
            .or_else(|| {
                let lowered = sheet_name.to_ascii_lowercase();
                Self::parse(&lowered.replace("week", ""), today)
            })
            .unwrap_or_else(|| Self::week_of(today))
    }

    /// `MM/DD/YYYY - MM/DD/YYYY`
    pub fn display(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%m/%d/%Y"),
            self.end.format("%m/%d/%Y")
        )
    }

    /// `MM_DD_YYYY_to_MM_DD_YYYY`
    pub fn file_stamp(&self) -> String {
        format!(
            "{}_to_{}",
            self.start.format("%m_%d_%Y"),
            self.end.format("%m_%d_%Y")
        )
    }
}

fn parse_period_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let mut parts = text.split(['.', '/']);
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let year = match parts.next() {
        Some(year) => {
            let year: i32 = year.parse().ok()?;
            if year < 100 {
                year + 2000
            } else {
                year
            }
        }
        None => today.year(),
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Normalizes a pickup date cell to `MM/DD/YYYY` when it is recognizable; otherwise the text is
/// kept as entered.
pub(crate) fn display_pickup_date(raw: &str) -> String {
    let trimmed = raw.trim();
    let date_part = trimmed.split_whitespace().next().unwrap_or(trimmed);
    // Two-digit years first: `%Y` would otherwise accept "25" as year 25.
    ["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d", "%m.%d.%y", "%m.%d.%Y", "%m-%d-%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
        .map(|date| date.format("%m/%d/%Y").to_string())
        .unwrap_or_else(|| trimmed.to_string())
}
