use once_cell::sync::Lazy;
use regex::Regex;

/// A four-digit year in parentheses plus any whitespace before it
static YEAR_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(\d{4}\)").expect("year annotation pattern is valid"));

/// Strips the first embedded "(YYYY)" annotation from a recommender title.
///
/// The metadata service indexes by bare title, so "Toy Story (1995)" has to be
/// looked up as "Toy Story". Only the first match is removed and the rest of the
/// string is left untouched.
pub fn normalize(title: &str) -> String {
    YEAR_ANNOTATION.replace(title, "").into_owned()
}
