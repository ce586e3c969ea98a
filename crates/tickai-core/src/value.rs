//! Text-to-number normalization for scraped statement cells.
//!
//! Statement pages render numbers with thousands separators, use `-` for
//! missing values, and suffix ratios with `%`. Everything here is lossy on
//! purpose: text that cannot be read as a number becomes `0` rather than an
//! error, so one odd cell never drops a whole period.

use crate::error::{Result, TickaiError};

/// Normalizes one cell of scraped text into a number.
///
/// - commas are removed (`"1,234"` → `1234.0`)
/// - `""` and `"-"` become `0`
/// - a trailing `%` is stripped and the number divided by 100 (`"12.5%"` → `0.125`)
/// - anything else that does not parse becomes `0`
#[must_use]
pub fn parse_value(text: &str) -> f64 {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return 0.0;
    }
    match cleaned.strip_suffix('%') {
        Some(number) => number.trim().parse::<f64>().map_or(0.0, |v| v / 100.0),
        None => cleaned.parse::<f64>().unwrap_or(0.0),
    }
}

/// Sums the numeric cells of a row, skipping the leading label cell.
///
/// Cells that are not numbers are skipped rather than counted as zero.
#[must_use]
pub fn sum_values<S: AsRef<str>>(cells: &[S]) -> f64 {
    cells
        .iter()
        .skip(1)
        .filter_map(|cell| cell.as_ref().trim().replace(',', "").parse::<f64>().ok())
        .sum()
}

/// Parses a `"low - high"` range such as a 52-week price range.
pub fn parse_range(text: &str) -> Result<(f64, f64)> {
    let (low, high) = text
        .split_once('-')
        .ok_or_else(|| TickaiError::Parse(format!("Expected a 'low - high' range, got {text:?}")))?;

    let parse = |part: &str| {
        part.trim()
            .replace(',', "")
            .parse::<f64>()
            .map_err(|e| TickaiError::Parse(format!("Invalid range bound {part:?}: {e}")))
    };

    Ok((parse(low)?, parse(high)?))
}
