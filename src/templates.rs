//! Template rendering for link columns
//!
//! Link columns render through Tera so hosts can override the markup by
//! supplying their own engine. The built-in templates are compiled into the
//! crate and registered under the names the columns look up, which keeps the
//! default path free of filesystem access.

use crate::error::{AdminBrowseError, AdminBrowseResult};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tera::{Context, Tera};
use tracing::error;

/// Template name rendered by change-link columns
pub const CHANGE_LINK_TEMPLATE: &str = "adminbrowse/link_to_change.html";

/// Template name rendered by changelist-link columns
pub const CHANGELIST_LINK_TEMPLATE: &str = "adminbrowse/link_to_changelist.html";

static DEFAULT_ENGINE: OnceLock<Arc<Tera>> = OnceLock::new();

fn default_engine() -> Arc<Tera> {
	DEFAULT_ENGINE
		.get_or_init(|| {
			let mut tera = Tera::default();
			if let Err(e) = tera.add_raw_templates(vec![
				(
					CHANGE_LINK_TEMPLATE,
					include_str!("../templates/adminbrowse/link_to_change.html"),
				),
				(
					CHANGELIST_LINK_TEMPLATE,
					include_str!("../templates/adminbrowse/link_to_changelist.html"),
				),
			]) {
				error!("failed to load built-in column templates: {e}");
			}
			Arc::new(tera)
		})
		.clone()
}

/// Column metadata exposed to templates as `column`
#[derive(Debug, Clone, Serialize)]
pub struct ColumnContext {
	pub label: String,
	pub default: String,
}

/// Context rendered by [`CHANGE_LINK_TEMPLATE`]
///
/// `value`, `url` and `title` are all absent when the bound attribute is
/// blank, so the template falls through to `column.default`.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeLinkContext {
	pub column: ColumnContext,
	pub object: Value,
	pub value: Option<String>,
	pub url: Option<String>,
	pub title: Option<String>,
}

/// Context rendered by [`CHANGELIST_LINK_TEMPLATE`]
///
/// `text` keeps its JSON type so a count of zero suppresses the link the
/// same way an empty string does.
#[derive(Debug, Clone, Serialize)]
pub struct ChangelistLinkContext {
	pub column: ColumnContext,
	pub object: Value,
	pub text: Value,
	pub url: Option<String>,
	pub title: Option<String>,
}

/// Serialize a context and merge caller-supplied extra values over it
pub fn context_with_extra<T: Serialize>(
	base: &T,
	extra: &HashMap<String, Value>,
) -> AdminBrowseResult<Context> {
	let mut context =
		Context::from_serialize(base).map_err(|e| AdminBrowseError::Template(e.to_string()))?;
	for (key, value) in extra {
		context.insert(key, value);
	}
	Ok(context)
}

/// Shared template engine handle for link columns
#[derive(Debug, Clone)]
pub struct ColumnTemplates {
	tera: Arc<Tera>,
}

impl Default for ColumnTemplates {
	fn default() -> Self {
		Self {
			tera: default_engine(),
		}
	}
}

impl ColumnTemplates {
	/// Use a host-supplied engine instead of the built-in templates
	pub fn with_tera(tera: Arc<Tera>) -> Self {
		Self { tera }
	}

	pub fn render(&self, name: &str, context: &Context) -> AdminBrowseResult<String> {
		self.tera
			.render(name, context)
			.map_err(|e| AdminBrowseError::Template(format!("{name}: {e}")))
	}
}
