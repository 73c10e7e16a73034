// Parsing and formatting helpers.
//
// All the tolerance for dirty spreadsheet cells lives here so the normalizers
// can treat every numeric field as a plain non-negative `f64`.
use chrono::{Datelike, NaiveDate};
use num_format::{Locale, ToFormattedString};

/// Decimal convention of one source file. Chosen per source, never per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    /// `1.234,5` (pt-BR exports).
    #[default]
    DecimalComma,
    /// `1,234.5`.
    DecimalPoint,
}

/// Parse a quantity cell into a non-negative finite `f64`.
///
/// - Trims whitespace and drops inner spaces used as digit grouping.
/// - Rejects text with alphabetic characters (units, `NaN`, `inf`, notes).
/// - Removes the thousands separator of `format`, then parses.
/// - Anything unparsable, negative or non-finite becomes `0.0`.
pub fn parse_quantity(s: &str, format: NumberFormat) -> f64 {
    // Exports group digits with spaces (sometimes non-breaking ones), so all
    // whitespace goes, not just the ends.
    let s: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    // Letters mean a unit, a note ("n/d", "sem medição") or `NaN`/`inf`;
    // none of those are quantities.
    if s.is_empty() || s.chars().any(|c| c.is_alphabetic()) {
        return 0.0;
    }
    // Drop the grouping separator first, then make the decimal mark a dot
    // so `str::parse` accepts it.
    let s = match format {
        NumberFormat::DecimalComma => s.replace('.', "").replace(',', "."),
        NumberFormat::DecimalPoint => s.replace(',', ""),
    };
    sanitize(s.parse::<f64>().ok())
}

/// Parse an hour cell. Clock notation (`8:30`, `07:45:00`) is converted to
/// decimal hours; anything else goes through [`parse_quantity`].
pub fn parse_hours(s: &str, format: NumberFormat) -> f64 {
    let s = s.trim();
    if !s.contains(':') {
        return parse_quantity(s, format);
    }
    // Access-control logs print durations as H:MM or HH:MM:SS. Hours may
    // exceed 24 (weekly totals); minutes and seconds must stay below 60.
    let mut parts = s.split(':');
    let hours = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
    let minutes = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
    let seconds = match parts.next() {
        Some(p) => p.trim().parse::<u32>().ok(),
        None => Some(0),
    };
    if parts.next().is_some() {
        return 0.0;
    }
    match (hours, minutes, seconds) {
        (Some(h), Some(m), Some(sec)) if m < 60 && sec < 60 => {
            h as f64 + m as f64 / 60.0 + sec as f64 / 3600.0
        }
        _ => 0.0,
    }
}

fn sanitize(v: Option<f64>) -> f64 {
    match v {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

/// Clamp a sum of non-negative finite values back into the finite range.
///
/// Each cell is finite, but enough huge cells overflow to `inf`; totals
/// saturate at `f64::MAX` instead.
pub fn saturate(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.min(f64::MAX)
    }
}

/// Month (`YYYY-MM`) of a date cell, if it holds a recognizable date.
///
/// Accepts `dd/mm/yyyy`, `dd/mm/yy`, `dd-mm-yyyy` and `yyyy-mm-dd`, with an
/// optional trailing time that is ignored.
pub fn parse_month(s: &str) -> Option<String> {
    let token = s.split_whitespace().next()?;
    let mut parts = token.split(['/', '-', '.']);
    let first = parts.next()?;
    let last = parts.last()?;
    let formats: &[&str] = if first.len() == 4 {
        &["%Y-%m-%d", "%Y/%m/%d"]
    } else if last.len() == 2 {
        &["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"]
    } else {
        &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"]
    };
    formats
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(token, f).ok())
        .map(|d| format!("{:04}-{:02}", d.year(), d.month()))
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    Some(saturate(v.iter().sum::<f64>()) / v.len() as f64)
}

/// Fixed decimals with `en` thousands grouping (`1,234,567.89`).
pub fn format_number(n: f64, decimals: usize) -> String {
    // Format the magnitude first (`1234567.89`) and group the integer
    // digits of that string, so values beyond any integer type still render.
    let fixed = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let grouped = group_thousands(int_part);
    // `-0.001` at two decimals prints as `0.00`, not `-0.00`.
    let sign = if n < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render an optional ratio; an undefined ratio is `n/a`, never `0`.
pub fn format_ratio(r: Option<f64>, decimals: usize) -> String {
    match r {
        Some(v) => format_number(v, decimals),
        None => "n/a".to_string(),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
