use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref URL: Regex = Regex::new(r"http\S+|www\.\S+").unwrap();
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9\s]+").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Normalizes a raw review into the form the classifiers were trained on:
/// lowercased, URLs stripped, everything outside `[a-z0-9 ]` stripped, and
/// whitespace collapsed.
///
/// Pure and idempotent; never fails. Empty input yields empty output.
///
/// # Example
/// ```
/// use sentimen::text::normalize;
///
/// let cleaned = normalize("Aplikasinya BAGUS!! tapi error http://x.co");
/// assert_eq!(cleaned, "aplikasinya bagus tapi error");
/// ```
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let no_urls = URL.replace_all(&lowered, " ");
    let alnum = NON_ALNUM.replace_all(&no_urls, " ");
    let collapsed = WHITESPACE.replace_all(&alnum, " ");
    collapsed.trim().to_string()
}
