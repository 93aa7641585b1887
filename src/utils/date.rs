use chrono::{Datelike, NaiveDate};

use crate::error::AppError;

/// Parse a month argument into (year, month).
///
/// Accepts `YYYY-MM`, `YYYYMM`, or any date inside the month as
/// `YYYY-MM-DD` / `YYYYMMDD`.
pub(crate) fn parse_month(s: &str) -> Result<(i32, u32), AppError> {
    let trimmed = s.trim();
    let invalid = || AppError::InvalidMonth {
        input: s.to_string(),
    };

    let date = match trimmed.len() {
        6 | 7 => {
            let padded = if trimmed.len() == 6 {
                format!("{trimmed}01")
            } else {
                format!("{trimmed}-01")
            };
            parse_date(&padded)
        }
        _ => parse_date(trimmed),
    };
    let date = date.ok_or_else(invalid)?;
    Ok((date.year(), date.month()))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    // Try YYYYMMDD
    if s.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Some(d);
    }
    // Try YYYY-MM-DD
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_forms() {
        assert_eq!(parse_month("2026-01").unwrap(), (2026, 1));
        assert_eq!(parse_month("202611").unwrap(), (2026, 11));
        assert_eq!(parse_month(" 2026-03 ").unwrap(), (2026, 3));
        assert_eq!(parse_month("2026-02-17").unwrap(), (2026, 2));
        assert_eq!(parse_month("20261231").unwrap(), (2026, 12));
    }

    #[test]
    fn invalid_months() {
        for input in ["2026-13", "2026", "jan", "2026-1x", ""] {
            let err = parse_month(input).unwrap_err();
            assert!(matches!(err, AppError::InvalidMonth { .. }), "{input}");
        }
    }
}
