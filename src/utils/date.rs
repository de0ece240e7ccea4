use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Resolve a period expression to an inclusive `(first, last)` date pair.
///
/// Accepted forms: `YYYY-MM-DD`, `YYYY-MM`, `YYYY`, and `A:B` where A and B
/// are any of the former.
pub fn resolve_period(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    if let Some((start, end)) = p.split_once(':') {
        let (first, _) = period_bounds(start)?;
        let (_, last) = period_bounds(end)?;
        if last < first {
            return Err(AppError::InvalidDate(format!(
                "range {p} ends before it starts"
            )));
        }
        return Ok((first, last));
    }
    period_bounds(p)
}

fn period_bounds(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let p = p.trim();

    // YYYY-MM-DD
    if let Some(d) = parse_date(p) {
        return Ok((d, d));
    }

    // YYYY-MM
    if let Ok(first) = NaiveDate::parse_from_str(&format!("{p}-01"), "%Y-%m-%d") {
        return Ok((first, last_day_of_month(first.year(), first.month())?));
    }

    // YYYY
    if p.len() == 4
        && let Ok(year) = p.parse::<i32>()
    {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| AppError::InvalidDate(p.to_string()))?;
        let last = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| AppError::InvalidDate(p.to_string()))?;
        return Ok((first, last));
    }

    Err(AppError::InvalidDate(format!("Invalid period: {p}")))
}

pub fn last_day_of_month(year: i32, month: u32) -> AppResult<NaiveDate> {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| AppError::InvalidDate(format!("{year}-{month:02}")))
}

/// First and last day of the month containing `date`.
pub fn month_of(date: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
    let first = date
        .with_day(1)
        .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
    Ok((first, last_day_of_month(date.year(), date.month())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn resolves_single_periods() {
        assert_eq!(resolve_period("2025-09-15").unwrap(), (d("2025-09-15"), d("2025-09-15")));
        assert_eq!(resolve_period("2024-02").unwrap(), (d("2024-02-01"), d("2024-02-29")));
        assert_eq!(resolve_period("2025").unwrap(), (d("2025-01-01"), d("2025-12-31")));
    }

    #[test]
    fn resolves_ranges() {
        assert_eq!(
            resolve_period("2024-12:2025-01").unwrap(),
            (d("2024-12-01"), d("2025-01-31"))
        );
        assert!(resolve_period("2025-02:2025-01").is_err());
        assert!(resolve_period("yesterday").is_err());
    }
}
