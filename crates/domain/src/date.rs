use chrono::prelude::*;

/// Parses a `YYYY-MM-DD` calendar date. Leading zeros are optional.
pub fn parse_date(datestr: &str) -> anyhow::Result<NaiveDate> {
    let (year, month, day) = is_valid_date(datestr)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| anyhow::Error::msg(datestr.to_string()))
}

fn is_valid_date(datestr: &str) -> anyhow::Result<(i32, u32, u32)> {
    let datestr = String::from(datestr.trim());
    let dates = datestr.split('-').collect::<Vec<_>>();
    if dates.len() != 3 {
        return Err(anyhow::Error::msg(datestr));
    }
    let year = dates[0].parse();
    let month = dates[1].parse();
    let day = dates[2].parse();

    let (year, month, day) = match (year, month, day) {
        (Ok(year), Ok(month), Ok(day)) => (year, month, day),
        _ => return Err(anyhow::Error::msg(datestr)),
    };

    if !(1970..=2100).contains(&year) || !(1..=12).contains(&month) {
        return Err(anyhow::Error::msg(datestr));
    }

    let month_length = get_month_length(year, month);

    if day < 1 || day > month_length {
        return Err(anyhow::Error::msg(datestr));
    }

    Ok((year, month, day))
}

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn get_month_length(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Moves `date` forward by whole calendar months.
///
/// The day of month is kept when the target month has it, otherwise it is
/// clamped to the last day of that month: Jan 31 + 1 month is Feb 28 (or 29),
/// and Feb 29 + 12 months is Feb 28.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let months_total = date.month0() + months;
    let year = date.year() + (months_total / 12) as i32;
    let month = months_total % 12 + 1;
    let day = date.day().min(get_month_length(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whole days from `from` to `to`. Negative when `to` lies before `from`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
