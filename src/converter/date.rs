use chrono::NaiveDate;

/// Formats used when no configuration overrides them.
pub const DEFAULT_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%B %d, %Y"];

/// Parse `value` with the first format that accepts it.
///
/// An empty value, or one no format accepts, yields `None`.
pub fn parse_date<S: AsRef<str>>(value: &str, formats: &[S]) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt.as_ref()).ok())
}
