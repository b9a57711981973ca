//! Admin URL naming and reversal
//!
//! Link columns never build URLs by hand. They resolve a named admin view
//! through a [`UrlReverser`] seeded by the host, so the crate stays agnostic
//! of how the site mounts its routes.

use crate::error::{AdminBrowseError, AdminBrowseResult};
use crate::schema::{ModelMeta, SchemaRegistry};
use std::collections::HashMap;
use tracing::debug;

/// Admin views a column can link to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminView {
	/// Change form of a single record
	Change,
	/// Changelist of a model
	Changelist,
}

impl AdminView {
	fn suffix(self) -> &'static str {
		match self {
			AdminView::Change => "change",
			AdminView::Changelist => "changelist",
		}
	}
}

/// Route name of an admin view, `"{site}:{app_label}_{model_name}_{view}"`
///
/// # Examples
///
/// ```
/// use adminbrowse::schema::ModelMeta;
/// use adminbrowse::urls::{admin_view_name, AdminView};
///
/// let meta = ModelMeta::new("library", "book");
/// assert_eq!(admin_view_name("admin", &meta, AdminView::Change), "admin:library_book_change");
/// ```
pub fn admin_view_name(site: &str, meta: &ModelMeta, view: AdminView) -> String {
	format!(
		"{}:{}_{}_{}",
		site,
		meta.app_label(),
		meta.model_name(),
		view.suffix()
	)
}

/// Substitute `{name}` placeholders in a single left-to-right pass
///
/// Placeholders without a supplied value stay in place, so the caller can
/// report them instead of producing a half-built URL.
fn substitute(pattern: &str, params: &HashMap<String, String>) -> String {
	let mut out = String::with_capacity(pattern.len());
	let mut chars = pattern.chars();

	while let Some(c) = chars.next() {
		if c != '{' {
			out.push(c);
			continue;
		}
		let mut name = String::new();
		let mut closed = false;
		for next in chars.by_ref() {
			if next == '}' {
				closed = true;
				break;
			}
			name.push(next);
		}
		if !closed {
			out.push('{');
			out.push_str(&name);
			break;
		}
		match params.get(&name) {
			Some(value) => out.push_str(value),
			None => {
				out.push('{');
				out.push_str(&name);
				out.push('}');
			}
		}
	}

	out
}

/// Parameter names a pattern expects
fn param_names(pattern: &str) -> Vec<String> {
	let mut names = Vec::new();
	let mut chars = pattern.chars();

	while let Some(c) = chars.next() {
		if c != '{' {
			continue;
		}
		let mut name = String::new();
		for next in chars.by_ref() {
			if next == '}' {
				if !name.is_empty() {
					names.push(std::mem::take(&mut name));
				}
				break;
			}
			name.push(next);
		}
	}

	names
}

/// Named route table with placeholder substitution
///
/// Patterns use `{name}` placeholders, `"/admin/library/book/{pk}/"`.
#[derive(Debug, Default)]
pub struct UrlReverser {
	routes: HashMap<String, String>,
}

impl UrlReverser {
	pub fn new() -> Self {
		Self {
			routes: HashMap::new(),
		}
	}

	pub fn register_path(&mut self, name: impl Into<String>, pattern: impl Into<String>) {
		let name = name.into();
		let pattern = pattern.into();
		debug!(route = %name, %pattern, "registered route");
		self.routes.insert(name, pattern);
	}

	/// Build the URL for a named route
	///
	/// Every placeholder in the pattern must have a value in `params`.
	pub fn reverse(
		&self,
		name: &str,
		params: &HashMap<String, String>,
	) -> AdminBrowseResult<String> {
		let pattern = self
			.routes
			.get(name)
			.ok_or_else(|| AdminBrowseError::RouteNotFound(name.to_string()))?;
		for param in param_names(pattern) {
			if !params.contains_key(&param) {
				return Err(AdminBrowseError::MissingRouteParam {
					route: name.to_string(),
					param,
				});
			}
		}
		Ok(substitute(pattern, params))
	}

	/// Build the URL for a named route from `(name, value)` pairs
	pub fn reverse_with<S: AsRef<str>>(
		&self,
		name: &str,
		params: &[(S, S)],
	) -> AdminBrowseResult<String> {
		let params: HashMap<String, String> = params
			.iter()
			.map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
			.collect();
		self.reverse(name, &params)
	}

	pub fn has_route(&self, name: &str) -> bool {
		self.routes.contains_key(name)
	}

	pub fn route_names(&self) -> Vec<&str> {
		self.routes.keys().map(String::as_str).collect()
	}
}

/// Register change and changelist routes for every model in `schema`
///
/// Change routes take a `pk` parameter. `base_path` is the mount point of
/// the admin site, `"/admin/"`.
pub fn register_admin_routes(
	reverser: &mut UrlReverser,
	site: &str,
	base_path: &str,
	schema: &SchemaRegistry,
) {
	let base = base_path.trim_end_matches('/');
	for meta in schema.models() {
		reverser.register_path(
			admin_view_name(site, meta, AdminView::Change),
			format!("{}/{}/{}/{{pk}}/", base, meta.app_label(), meta.model_name()),
		);
		reverser.register_path(
			admin_view_name(site, meta, AdminView::Changelist),
			format!("{}/{}/{}/", base, meta.app_label(), meta.model_name()),
		);
	}
}
