//! HTML escaping for column output

/// Escape HTML special characters
///
/// # Examples
///
/// ```
/// use adminbrowse::html::escape;
///
/// assert_eq!(escape("Hello, World!"), "Hello, World!");
/// assert_eq!(escape("<script>alert('XSS')</script>"),
///            "&lt;script&gt;alert(&#x27;XSS&#x27;)&lt;/script&gt;");
/// assert_eq!(escape("5 < 10 & 10 > 5"), "5 &lt; 10 &amp; 10 &gt; 5");
/// ```
pub fn escape(text: &str) -> String {
	let mut result = String::with_capacity(text.len() + 10);
	for ch in text.chars() {
		match ch {
			'&' => result.push_str("&amp;"),
			'<' => result.push_str("&lt;"),
			'>' => result.push_str("&gt;"),
			'"' => result.push_str("&quot;"),
			'\'' => result.push_str("&#x27;"),
			_ => result.push(ch),
		}
	}
	result
}

/// Format an HTML template by substituting placeholder values with escaped content
///
/// Placeholders are in the format `{key}` and are replaced with the
/// HTML-escaped value, so markup assembled here is safe against injection
/// through cell values.
///
/// # Examples
///
/// ```
/// use adminbrowse::html::format_html;
///
/// let template = "<a href=\"{url}\">{text}</a>";
/// let args = [("url", "http://example.com/"), ("text", "example")];
/// assert_eq!(
///     format_html(template, &args),
///     "<a href=\"http://example.com/\">example</a>"
/// );
///
/// let args = [("url", "#"), ("text", "<script>")];
/// assert_eq!(
///     format_html("<a href=\"{url}\">{text}</a>", &args),
///     "<a href=\"#\">&lt;script&gt;</a>"
/// );
/// ```
pub fn format_html(template: &str, args: &[(&str, &str)]) -> String {
	let mut result = template.to_string();
	for (key, value) in args {
		let placeholder = format!("{{{}}}", key);
		let escaped_value = escape(value);
		result = result.replace(&placeholder, &escaped_value);
	}
	result
}
