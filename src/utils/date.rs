use crate::db::db_utils::Window;
use crate::errors::{AppError, AppResult};
use chrono::{Days, Local, NaiveDate, TimeZone, Utc};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn invalid(r: &str) -> AppError {
    AppError::InvalidDate(r.to_string())
}

fn month_last_day(y: i32, m: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(y, m, 1)?;
    let next = if m == 12 {
        NaiveDate::from_ymd_opt(y + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(y, m + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

/// First and last day covered by one period token: `YYYY`, `YYYY-MM` or
/// `YYYY-MM-DD`.
fn period_bounds(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let p = p.trim();
    match p.len() {
        4 => {
            let y: i32 = p.parse().map_err(|_| invalid(p))?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| invalid(p))?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| invalid(p))?;
            Ok((d1, d2))
        }
        7 => {
            let y: i32 = p[0..4].parse().map_err(|_| invalid(p))?;
            let m: u32 = p.get(5..7).and_then(|s| s.parse().ok()).ok_or_else(|| invalid(p))?;
            let last = month_last_day(y, m).ok_or_else(|| invalid(p))?;
            let d1 = NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(|| invalid(p))?;
            let d2 = NaiveDate::from_ymd_opt(y, m, last).ok_or_else(|| invalid(p))?;
            Ok((d1, d2))
        }
        10 => {
            let d = parse_date(p).ok_or_else(|| invalid(p))?;
            Ok((d, d))
        }
        _ => Err(invalid(p)),
    }
}

/// Parse a `--period`/`--range` value into inclusive calendar bounds.
///
/// Supported:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - any of the above as `start:end`, both sides in the same format
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    if let Some((start, end)) = r.split_once(':') {
        if start.trim().len() != end.trim().len() {
            return Err(AppError::InvalidDate(format!(
                "{}: start and end must have the same format",
                r
            )));
        }
        let (d1, _) = period_bounds(start)?;
        let (_, d2) = period_bounds(end)?;
        if d2 < d1 {
            return Err(AppError::InvalidDate(format!("{}: end is before start", r)));
        }
        return Ok((d1, d2));
    }
    period_bounds(r)
}

/// Start of a local calendar day, as a UTC instant.
pub fn local_midnight_utc(d: NaiveDate) -> AppResult<chrono::DateTime<Utc>> {
    let naive = d.and_hms_opt(0, 0, 0).ok_or_else(|| invalid(&d.to_string()))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| invalid(&d.to_string()))
}

/// Store-side filter for a period. `None` or `all` means no limit;
/// the bounds are local days, the window is `[first day 00:00, day after last 00:00)`.
pub fn period_window(period: Option<&str>) -> AppResult<Window> {
    let Some(p) = period.map(str::trim).filter(|p| !p.eq_ignore_ascii_case("all")) else {
        return Ok(None);
    };
    let (d1, d2) = parse_range(p)?;
    let after = d2.checked_add_days(Days::new(1)).ok_or_else(|| invalid(p))?;
    Ok(Some((local_midnight_utc(d1)?, local_midnight_utc(after)?)))
}

