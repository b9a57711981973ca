//! Relation-aware link columns
//!
//! These columns turn relations into navigation: a to-one value links to the
//! related record's change form, a to-many accessor links to the related
//! model's changelist filtered down to the bound record. URLs and titles are
//! resolved against a [`BrowseSite`] at construction, so a misconfigured
//! site surfaces when columns are built, not per row.

use crate::columns::{FieldBinding, FieldKind, ListColumn};
use crate::error::{AdminBrowseError, AdminBrowseResult};
use crate::records::{display_text, is_blank, related_items, scalar_text, Record};
use crate::schema::{ModelMeta, SchemaRegistry};
use crate::site::BrowseSite;
use crate::templates::{
	context_with_extra, ChangeLinkContext, ChangelistLinkContext, ColumnContext, ColumnTemplates,
	CHANGELIST_LINK_TEMPLATE, CHANGE_LINK_TEMPLATE,
};
use crate::urls::{admin_view_name, AdminView, UrlReverser};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Column linking a to-one relation to the related record's change form
///
/// Renders an empty anchor followed by the related record's display text;
/// the stylesheet draws the link icon. Blank values render the default with
/// no link.
#[derive(Debug)]
pub struct ChangeLinkColumn {
	binding: FieldBinding,
	target: Arc<ModelMeta>,
	label: String,
	default: String,
	title: String,
	view_name: String,
	urls: Arc<UrlReverser>,
	templates: ColumnTemplates,
	template_name: String,
	extra_context: HashMap<String, Value>,
}

impl ChangeLinkColumn {
	pub fn new(site: &BrowseSite, model: &str, field: &str) -> AdminBrowseResult<Self> {
		let binding = FieldBinding::resolve(site.schema(), model, field)?;
		let (FieldKind::ToOneDirect, Some(target)) = (binding.kind(), binding.target().cloned())
		else {
			return Err(AdminBrowseError::NotToOne {
				model: model.to_string(),
				field: field.to_string(),
			});
		};

		let label = binding.attr_label().to_string();
		let title = format!("Go to {}", binding.attr_label());
		let view_name = admin_view_name(site.name(), &target, AdminView::Change);
		Ok(Self {
			binding,
			target,
			label,
			default: String::new(),
			title,
			view_name,
			urls: site.urls(),
			templates: site.templates().clone(),
			template_name: CHANGE_LINK_TEMPLATE.to_string(),
			extra_context: HashMap::new(),
		})
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	pub fn with_default(mut self, default: impl Into<String>) -> Self {
		self.default = default.into();
		self
	}

	pub fn with_template(mut self, template_name: impl Into<String>) -> Self {
		self.template_name = template_name.into();
		self
	}

	pub fn with_context_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.extra_context.insert(key.into(), value);
		self
	}

	/// Template context for one record
	///
	/// Blank values produce a context with no `value`, `url` or `title`, so
	/// the template falls through to the default.
	pub fn link_context(&self, record: &Record) -> AdminBrowseResult<ChangeLinkContext> {
		let column = ColumnContext {
			label: self.label.clone(),
			default: self.default.clone(),
		};
		let object = Value::Object(record.clone());

		let context = match self.binding.value(record) {
			Some(related) if !is_blank(Some(related)) => {
				let key = self.related_key(related)?;
				let url = self
					.urls
					.reverse_with(&self.view_name, &[("pk", key.as_str())])?;
				ChangeLinkContext {
					column,
					object,
					value: Some(display_text(&self.target, related)),
					url: Some(url),
					title: Some(self.title.clone()),
				}
			}
			_ => ChangeLinkContext {
				column,
				object,
				value: None,
				url: None,
				title: None,
			},
		};
		Ok(context)
	}

	/// Primary key of the related value, for the change URL
	///
	/// Nested objects must carry the target's primary key; a plain value is
	/// taken to be the key itself.
	fn related_key(&self, related: &Value) -> AdminBrowseResult<String> {
		match related {
			Value::Object(fields) => fields
				.get(self.target.pk_field())
				.map(scalar_text)
				.ok_or_else(|| AdminBrowseError::MissingAttribute {
					model: self.target.key(),
					attr: self.target.pk_field().to_string(),
				}),
			other => Ok(scalar_text(other)),
		}
	}
}

impl ListColumn for ChangeLinkColumn {
	fn label(&self) -> &str {
		&self.label
	}

	fn order_field(&self) -> Option<&str> {
		self.binding.order_field()
	}

	fn is_safe(&self) -> bool {
		true
	}

	fn render(&self, record: &Record) -> AdminBrowseResult<String> {
		let context = self.link_context(record)?;
		let context = context_with_extra(&context, &self.extra_context)?;
		self.templates.render(&self.template_name, &context)
	}
}

/// Column rendering a to-many accessor as joined display texts
#[derive(Debug)]
pub struct RelatedListColumn {
	binding: FieldBinding,
	label: String,
	default: String,
	separator: String,
}

impl RelatedListColumn {
	pub fn new(schema: &SchemaRegistry, model: &str, field: &str) -> AdminBrowseResult<Self> {
		let binding = FieldBinding::resolve(schema, model, field)?;
		if !binding.kind().is_to_many() {
			return Err(AdminBrowseError::NotToMany {
				model: model.to_string(),
				field: field.to_string(),
			});
		}
		let label = binding.attr_label().to_string();
		Ok(Self {
			binding,
			label,
			default: String::new(),
			separator: ", ".to_string(),
		})
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	pub fn with_default(mut self, default: impl Into<String>) -> Self {
		self.default = default.into();
		self
	}

	pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
		self.separator = separator.into();
		self
	}
}

impl ListColumn for RelatedListColumn {
	fn label(&self) -> &str {
		&self.label
	}

	fn render(&self, record: &Record) -> AdminBrowseResult<String> {
		let items = self.binding.items_text(record);
		if items.is_empty() {
			return Ok(self.default.clone());
		}
		Ok(items.join(&self.separator))
	}
}

/// Link text of a [`ChangelistLinkColumn`]
pub enum LinkText {
	/// Number of related items
	Count,
	/// Fixed text
	Literal(String),
	/// Text computed from the related items
	Custom(Box<dyn Fn(&[Value]) -> String + Send + Sync>),
}

impl fmt::Debug for LinkText {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LinkText::Count => f.write_str("Count"),
			LinkText::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
			LinkText::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}

/// Truthiness the changelist template applies to its text
fn text_is_present(text: &Value) -> bool {
	match text {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
		Value::String(s) => !s.is_empty(),
		Value::Array(items) => !items.is_empty(),
		Value::Object(fields) => !fields.is_empty(),
	}
}

/// Column linking a to-many accessor to the related model's changelist
///
/// The URL is the related changelist filtered by the relation,
/// `"{changelist}?{relation}__{key}__exact={value}"`. Link text defaults to
/// the item count; a count of zero renders the default with no link.
#[derive(Debug)]
pub struct ChangelistLinkColumn {
	binding: FieldBinding,
	label: String,
	default: String,
	text: LinkText,
	title: String,
	view_name: String,
	reverse_name: String,
	local_key: String,
	urls: Arc<UrlReverser>,
	templates: ColumnTemplates,
	template_name: String,
	extra_context: HashMap<String, Value>,
}

impl ChangelistLinkColumn {
	pub fn new(site: &BrowseSite, model: &str, field: &str) -> AdminBrowseResult<Self> {
		let binding = FieldBinding::resolve(site.schema(), model, field)?;
		let (true, Some(target), Some(reverse_name), Some(local_key)) = (
			binding.kind().is_to_many(),
			binding.target().cloned(),
			binding.reverse_name().map(String::from),
			binding.local_key().map(String::from),
		) else {
			return Err(AdminBrowseError::NotToMany {
				model: model.to_string(),
				field: field.to_string(),
			});
		};

		let owner_label = if binding.via_m2m() {
			binding.model().verbose_name()
		} else {
			binding
				.remote_field_label()
				.unwrap_or_else(|| binding.attr_label())
				.to_string()
		};
		let title = format!(
			"List {} with this {}",
			target.verbose_name_plural(),
			owner_label
		);
		let view_name = admin_view_name(site.name(), &target, AdminView::Changelist);
		let label = binding.attr_label().to_string();
		Ok(Self {
			binding,
			label,
			default: String::new(),
			text: LinkText::Count,
			title,
			view_name,
			reverse_name,
			local_key,
			urls: site.urls(),
			templates: site.templates().clone(),
			template_name: CHANGELIST_LINK_TEMPLATE.to_string(),
			extra_context: HashMap::new(),
		})
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	pub fn with_default(mut self, default: impl Into<String>) -> Self {
		self.default = default.into();
		self
	}

	/// Use fixed link text instead of the item count
	pub fn with_text(mut self, text: impl Into<String>) -> Self {
		self.text = LinkText::Literal(text.into());
		self
	}

	/// Compute link text from the related items
	pub fn with_text_fn<F>(mut self, f: F) -> Self
	where
		F: Fn(&[Value]) -> String + Send + Sync + 'static,
	{
		self.text = LinkText::Custom(Box::new(f));
		self
	}

	pub fn with_template(mut self, template_name: impl Into<String>) -> Self {
		self.template_name = template_name.into();
		self
	}

	pub fn with_context_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.extra_context.insert(key.into(), value);
		self
	}

	/// Template context for one record
	///
	/// Empty text produces a context with no `url` or `title`, so the
	/// template falls through to the default without touching the route
	/// table.
	pub fn link_context(&self, record: &Record) -> AdminBrowseResult<ChangelistLinkContext> {
		let column = ColumnContext {
			label: self.label.clone(),
			default: self.default.clone(),
		};
		let object = Value::Object(record.clone());
		let items = related_items(self.binding.value(record));
		let text = match &self.text {
			LinkText::Count => Value::from(items.len() as u64),
			LinkText::Literal(text) => Value::from(text.clone()),
			LinkText::Custom(f) => Value::from(f(items)),
		};
		if !text_is_present(&text) {
			return Ok(ChangelistLinkContext {
				column,
				object,
				text,
				url: None,
				title: None,
			});
		}

		let key_value =
			record
				.get(&self.local_key)
				.ok_or_else(|| AdminBrowseError::MissingAttribute {
					model: self.binding.model().key(),
					attr: self.local_key.clone(),
				})?;
		let base = self.urls.reverse_with::<&str>(&self.view_name, &[])?;
		let url = format!(
			"{}?{}__{}__exact={}",
			base,
			self.reverse_name,
			self.local_key,
			scalar_text(key_value)
		);
		Ok(ChangelistLinkContext {
			column,
			object,
			text,
			url: Some(url),
			title: Some(self.title.clone()),
		})
	}
}

impl ListColumn for ChangelistLinkColumn {
	fn label(&self) -> &str {
		&self.label
	}

	fn order_field(&self) -> Option<&str> {
		self.binding.order_field()
	}

	fn is_safe(&self) -> bool {
		true
	}

	fn render(&self, record: &Record) -> AdminBrowseResult<String> {
		let context = self.link_context(record)?;
		let context = context_with_extra(&context, &self.extra_context)?;
		self.templates.render(&self.template_name, &context)
	}
}
