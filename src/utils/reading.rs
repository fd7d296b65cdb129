use crate::utils::constants::NO_READING_SENTINELS;

/// Coerce a cell to a temperature, or `None` when it is not a usable number.
///
/// Accepts a decimal comma and a trailing degree sign. Sentinels, text and
/// non-finite values all yield `None`, never zero.
pub fn parse_reading(raw: &str) -> Option<f64> {
    let cell = raw.trim();
    if NO_READING_SENTINELS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(cell))
    {
        return None;
    }

    let cell = cell
        .trim_end_matches(['C', 'c'])
        .trim_end_matches('\u{00b0}')
        .trim_end();

    let parsed = if cell.contains(',') && !cell.contains('.') {
        cell.replace(',', ".").parse::<f64>()
    } else {
        cell.parse::<f64>()
    };

    parsed.ok().filter(|v| v.is_finite())
}
