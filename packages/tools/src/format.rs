//! Shared output formatting helpers.
//!
//! Counts render with thousands separators and no decimals; percentages
//! render with one decimal and an explicit sign; months render as
//! `Mon YYYY` (short) or `Month YYYY` (long), passing the raw string
//! through when it cannot be parsed.

use chrono::NaiveDate;

use crate::ToolError;

/// Output mode for the forecast and history tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable prose.
    Summary,
    /// Structured JSON.
    Detailed,
}

/// Parses the `format` parameter, case-insensitively.
///
/// # Errors
///
/// Returns a validation error naming both accepted values for anything
/// other than `summary` or `detailed`.
pub fn parse_output_format(input: &str) -> Result<OutputFormat, ToolError> {
    match input.trim().to_lowercase().as_str() {
        "summary" => Ok(OutputFormat::Summary),
        "detailed" => Ok(OutputFormat::Detailed),
        _ => Err(ToolError::Validation {
            message: format!(
                "Invalid format '{input}'. Use 'summary' for prose output or \
                 'detailed' for full JSON data."
            ),
        }),
    }
}

/// Formats a count with thousands separators and no decimal places.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_count(value: f64) -> String {
    let rounded = if value.is_finite() { value.round() as i64 } else { 0 };
    group_thousands(rounded)
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats a percentage with one decimal place and an explicit `+` sign
/// when non-negative.
#[must_use]
pub fn format_signed_percent(value: f64) -> String {
    format!("{value:+.1}%")
}

/// Rounds to two decimal places, for percent values in detailed output.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn parse_year_month(date: &str) -> Option<NaiveDate> {
    let (year, month) = date.get(..7)?.split_once('-')?;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// Formats a `YYYY-MM` (or `YYYY-MM-DD`) date as `Mon YYYY`.
///
/// Unparseable input is returned unchanged.
#[must_use]
pub fn format_month_short(date: &str) -> String {
    parse_year_month(date).map_or_else(|| date.to_string(), |d| d.format("%b %Y").to_string())
}

/// Formats a `YYYY-MM` (or `YYYY-MM-DD`) date as `Month YYYY`.
///
/// Unparseable input is returned unchanged.
#[must_use]
pub fn format_month_long(date: &str) -> String {
    parse_year_month(date).map_or_else(|| date.to_string(), |d| d.format("%B %Y").to_string())
}

/// Title-cases a hyphenated offense name (e.g. `"motor-vehicle-theft"` ->
/// `"Motor Vehicle Theft"`).
///
/// Used where the name comes off the wire as a string (the model catalog);
/// canonical offenses use [`ucr_forecast_taxonomy::Offense::display_name`].
#[must_use]
pub fn title_case(name: &str) -> String {
    name.split(['-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_get_thousands_separators() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1000.0), "1,000");
        assert_eq!(format_count(83_822.4), "83,822");
        assert_eq!(format_count(1_234_567.0), "1,234,567");
        assert_eq!(format_count(-12_345.0), "-12,345");
    }

    #[test]
    fn signed_percent_one_decimal() {
        assert_eq!(format_signed_percent(10.0), "+10.0%");
        assert_eq!(format_signed_percent(-0.25), "-0.2%");
        assert_eq!(format_signed_percent(0.0), "+0.0%");
        assert_eq!(format_signed_percent(19.74), "+19.7%");
    }

    #[test]
    fn month_formats() {
        assert_eq!(format_month_short("2025-01"), "Jan 2025");
        assert_eq!(format_month_short("2024-12-15"), "Dec 2024");
        assert_eq!(format_month_long("2024-10"), "October 2024");
        assert_eq!(format_month_short("not-a-date"), "not-a-date");
        assert_eq!(format_month_short(""), "");
        assert_eq!(format_month_short("2024-13"), "2024-13");
    }

    #[test]
    fn format_param_parsing() {
        assert_eq!(parse_output_format("summary").unwrap(), OutputFormat::Summary);
        assert_eq!(parse_output_format(" DETAILED ").unwrap(), OutputFormat::Detailed);
        assert!(parse_output_format("markdown").is_err());
    }

    #[test]
    fn title_cases_hyphenated_names() {
        assert_eq!(title_case("motor-vehicle-theft"), "Motor Vehicle Theft");
        assert_eq!(title_case("homicide"), "Homicide");
        assert_eq!(title_case("violent-crime"), "Violent Crime");
    }
}
