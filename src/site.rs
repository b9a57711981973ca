//! Browse site facade
//!
//! A [`BrowseSite`] bundles the three things link columns need at
//! construction time: the schema, the route table, and a template engine.
//! Hosts build one per admin site and hand it to column constructors.

use crate::columns::{FieldColumn, ListColumn, UrlColumn};
use crate::error::AdminBrowseResult;
use crate::related::ChangeLinkColumn;
use crate::schema::{FieldType, SchemaRegistry};
use crate::templates::ColumnTemplates;
use crate::urls::UrlReverser;
use std::sync::Arc;
use tracing::debug;

/// Schema, routes and templates of one admin site
pub struct BrowseSite {
	name: String,
	schema: Arc<SchemaRegistry>,
	urls: Arc<UrlReverser>,
	templates: ColumnTemplates,
}

impl BrowseSite {
	/// Site named `"admin"` over the given schema and routes
	pub fn new(schema: SchemaRegistry, urls: UrlReverser) -> Self {
		Self {
			name: "admin".to_string(),
			schema: Arc::new(schema),
			urls: Arc::new(urls),
			templates: ColumnTemplates::default(),
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	pub fn with_templates(mut self, templates: ColumnTemplates) -> Self {
		self.templates = templates;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn schema(&self) -> &SchemaRegistry {
		&self.schema
	}

	pub fn urls(&self) -> Arc<UrlReverser> {
		self.urls.clone()
	}

	pub fn templates(&self) -> &ColumnTemplates {
		&self.templates
	}

	/// Build changelist columns for `fields`, upgrading by field type
	///
	/// Foreign keys become change links and URL fields become external
	/// links; everything else renders as plain text. Unknown names are an
	/// error.
	pub fn build_columns(
		&self,
		model: &str,
		fields: &[&str],
	) -> AdminBrowseResult<Vec<Box<dyn ListColumn>>> {
		debug!(%model, ?fields, "building changelist columns");
		let meta = self.schema.get(model)?;
		let mut columns: Vec<Box<dyn ListColumn>> = Vec::with_capacity(fields.len());
		for field in fields {
			let field_type = meta.field(field).map(|f| f.field_type);
			let column: Box<dyn ListColumn> = match field_type {
				Some(FieldType::ForeignKey) => {
					Box::new(ChangeLinkColumn::new(self, model, field)?)
				}
				Some(FieldType::Url) => Box::new(UrlColumn::new(self.schema(), model, field)?),
				_ => Box::new(FieldColumn::new(self.schema(), model, field)?),
			};
			columns.push(column);
		}
		Ok(columns)
	}
}
