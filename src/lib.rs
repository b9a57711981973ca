//! # adminbrowse
//!
//! Related-object links and browsing columns for admin changelist views.
//!
//! ## Overview
//!
//! Changelists usually render relations as flat text. This crate turns them
//! into navigation: a foreign key links to the related record's change form,
//! a to-many accessor links to the related model's changelist filtered down
//! to the current record, URL fields open in a new window, and long text is
//! cut at a character count. Columns resolve their attributes against a
//! schema registry once, at construction, and render dynamic JSON records
//! after that.
//!
//! ## Features
//!
//! - ✅ Change-form links for to-one relations
//! - ✅ Filtered changelist links for to-many relations, direct or reverse
//! - ✅ Plain related-object lists with configurable separators
//! - ✅ External links for URL fields
//! - ✅ Character-count truncation
//! - ✅ Template-driven link markup, overridable per site
//!
//! ## Quick Start
//!
//! ```
//! use adminbrowse::schema::{FieldMeta, FieldType, ModelMeta, SchemaRegistry};
//! use adminbrowse::{link_to_url, ListColumn, Record};
//! use serde_json::json;
//!
//! let mut schema = SchemaRegistry::new();
//! schema.register(
//! 	ModelMeta::new("library", "person")
//! 		.with_field(FieldMeta::new("id", FieldType::Auto))
//! 		.with_field(FieldMeta::new("website", FieldType::Url)),
//! );
//!
//! let column = link_to_url(&schema, "library.person", "website")?;
//! let mut row = Record::new();
//! row.insert("website".to_string(), json!("http://example.com/"));
//! assert_eq!(
//! 	column.render(&row)?,
//! 	"<a href=\"http://example.com/\" target=\"_blank\" class=\"external\" \
//! 	 title=\"Open URL in a new window\">http://example.com/</a>"
//! );
//! # Ok::<(), adminbrowse::AdminBrowseError>(())
//! ```
//!
//! Link columns need a [`BrowseSite`] so they can reverse admin URLs; see
//! [`link_to_change`] and [`link_to_changelist`].

// Core modules
pub mod columns;
pub mod error;
pub mod html;
pub mod records;
pub mod related;
pub mod schema;
pub mod site;
pub mod templates;
pub mod text;
pub mod urls;

// Re-exports
pub use columns::{
	FieldBinding, FieldColumn, FieldKind, ListColumn, TemplateColumn, TruncatedColumn, UrlColumn,
};
pub use error::{AdminBrowseError, AdminBrowseResult};
pub use records::Record;
pub use related::{ChangeLinkColumn, ChangelistLinkColumn, LinkText, RelatedListColumn};
pub use schema::{FieldMeta, FieldType, ModelMeta, RelationMeta, SchemaRegistry};
pub use site::BrowseSite;
pub use templates::{ColumnTemplates, CHANGELIST_LINK_TEMPLATE, CHANGE_LINK_TEMPLATE};
pub use urls::{admin_view_name, register_admin_routes, AdminView, UrlReverser};

use std::path::{Path, PathBuf};

/// Stylesheet drawing the link icons, for inclusion in admin media
pub const STYLESHEET: &str = include_str!("../static/css/adminbrowse.css");

/// Directory holding the crate's static assets
pub fn static_dir() -> PathBuf {
	Path::new(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// Plain text column over any attribute
pub fn model_field(
	schema: &SchemaRegistry,
	model: &str,
	field: &str,
) -> AdminBrowseResult<FieldColumn> {
	FieldColumn::new(schema, model, field)
}

/// Column rendering an arbitrary template against the whole record
pub fn template_column(
	label: impl Into<String>,
	template_name: impl Into<String>,
) -> TemplateColumn {
	TemplateColumn::new(label, template_name)
}

/// Column linking a to-one relation to its change form
pub fn link_to_change(
	site: &BrowseSite,
	model: &str,
	field: &str,
) -> AdminBrowseResult<ChangeLinkColumn> {
	ChangeLinkColumn::new(site, model, field)
}

/// Column listing a to-many accessor as joined display texts
pub fn related_list(
	schema: &SchemaRegistry,
	model: &str,
	field: &str,
) -> AdminBrowseResult<RelatedListColumn> {
	RelatedListColumn::new(schema, model, field)
}

/// Column linking a to-many accessor to a filtered changelist
pub fn link_to_changelist(
	site: &BrowseSite,
	model: &str,
	field: &str,
) -> AdminBrowseResult<ChangelistLinkColumn> {
	ChangelistLinkColumn::new(site, model, field)
}

/// Column rendering a URL field as an external link
pub fn link_to_url(
	schema: &SchemaRegistry,
	model: &str,
	field: &str,
) -> AdminBrowseResult<UrlColumn> {
	UrlColumn::new(schema, model, field)
}

/// Column rendering text cut at `max_length` characters
pub fn truncated_field(
	schema: &SchemaRegistry,
	model: &str,
	field: &str,
	max_length: usize,
) -> AdminBrowseResult<TruncatedColumn> {
	TruncatedColumn::new(schema, model, field, max_length)
}
