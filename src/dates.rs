use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// Parses the date spellings that show up in sheet cells, first match wins:
/// dotted `D.M.YYYY`, ISO `YYYY-MM-DD`, `MM/DD/YYYY`, `YYYY/MM/DD`, then a
/// general fallback for timestamp strings and gviz `Date(y,m,d)` cells.
///
/// A dotted triple is ambiguous; the first part is the day of month when it
/// exceeds 12, otherwise it is the month.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(date) = parse_dotted(input) {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(date);
        }
    }

    parse_fallback(input)
}

/// Always zero-padded `DD.MM.YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// The next payment is due exactly one week after the last one. `None` only
/// when the date is so close to the calendar's edge that adding a week
/// overflows.
pub fn next_payment_date(last_payment: NaiveDate) -> Option<NaiveDate> {
    last_payment.checked_add_signed(Duration::days(7))
}

fn parse_dotted(input: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split('.').collect();
    let [first, second, year] = parts.as_slice() else {
        return None;
    };

    let first: u32 = first.trim().parse().ok()?;
    let second: u32 = second.trim().parse().ok()?;
    let year: i32 = year.trim().parse().ok()?;

    let (day, month) = if first > 12 {
        (first, second)
    } else {
        (second, first)
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_fallback(input: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Some(timestamp.date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Some(timestamp.date());
    }
    parse_gviz(input)
}

// Google Visualization date cells arrive as "Date(2024,0,23)" with a
// zero-based month.
fn parse_gviz(input: &str) -> Option<NaiveDate> {
    let inner = input.strip_prefix("Date(")?.strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').collect();
    let [year, month, day] = parts.as_slice() else {
        return None;
    };

    let year: i32 = year.trim().parse().ok()?;
    let month: u32 = month.trim().parse().ok()?;
    let day: u32 = day.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month + 1, day)
}
