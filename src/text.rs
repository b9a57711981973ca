//! Text helpers for column labels and cell values

/// Truncate text to a maximum number of characters, appending `tail` when cut
///
/// Length comparison and slicing operate on character count, not byte count,
/// so multi-byte text truncates cleanly.
///
/// # Examples
///
/// ```
/// use adminbrowse::text::truncate_chars;
///
/// assert_eq!(truncate_chars("http://example.com/twain", 8, "…"), "http://e…");
/// assert_eq!(truncate_chars("short", 8, "…"), "short");
/// assert_eq!(truncate_chars("exact", 5, "…"), "exact");
/// ```
pub fn truncate_chars(text: &str, max_length: usize, tail: &str) -> String {
	if text.chars().count() > max_length {
		let mut result: String = text.chars().take(max_length).collect();
		result.push_str(tail);
		result
	} else {
		text.to_string()
	}
}

/// Default human label for a field or accessor name
///
/// Replaces underscores with spaces, the way the framework labels fields that
/// declare no verbose name.
///
/// # Examples
///
/// ```
/// use adminbrowse::text::default_verbose_name;
///
/// assert_eq!(default_verbose_name("logentry_set"), "logentry set");
/// assert_eq!(default_verbose_name("title"), "title");
/// ```
pub fn default_verbose_name(name: &str) -> String {
	name.replace('_', " ")
}
