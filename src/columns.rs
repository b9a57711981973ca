//! Changelist columns
//!
//! A column is anything that can label itself and render one cell per
//! record. Value columns render plain text from a bound attribute; the
//! relation-aware link columns live in [`crate::related`]. Every column
//! resolves its attribute against the schema once, at construction, so
//! rendering is a pure record-to-string step.

use crate::error::{AdminBrowseError, AdminBrowseResult};
use crate::html::format_html;
use crate::records::{display_text, is_blank, related_items, scalar_text, Record};
use crate::schema::{FieldType, ModelMeta, SchemaRegistry};
use crate::templates::{ColumnContext, ColumnTemplates};
use crate::text::truncate_chars;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tera::Context;

/// One changelist column
///
/// Implementations are immutable after construction and shared across
/// request handlers, hence `Send + Sync`.
pub trait ListColumn: fmt::Debug + Send + Sync {
	/// Header label
	fn label(&self) -> &str;

	/// Field the changelist can sort by, when the column is sortable
	fn order_field(&self) -> Option<&str> {
		None
	}

	/// Whether rendered output is HTML that must not be escaped again
	fn is_safe(&self) -> bool {
		false
	}

	/// Render one cell
	fn render(&self, record: &Record) -> AdminBrowseResult<String>;
}

/// Shape of a bound attribute, classified once at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
	/// Plain value field
	Scalar,
	/// Foreign key declared on the bound model
	ToOneDirect,
	/// Many-to-many declared on the bound model
	ToManyDirect,
	/// Reverse accessor of a relation declared elsewhere
	ToManyReverse,
}

impl FieldKind {
	pub fn is_direct(self) -> bool {
		!matches!(self, FieldKind::ToManyReverse)
	}

	pub fn is_to_many(self) -> bool {
		matches!(self, FieldKind::ToManyDirect | FieldKind::ToManyReverse)
	}
}

/// A column's resolved view of one attribute
///
/// Resolution classifies the attribute into a [`FieldKind`] and precomputes
/// everything rendering needs: the human label, the sort field, the related
/// model, and for to-many shapes the changelist filter pieces. Columns built
/// over a binding never touch the schema again.
#[derive(Debug, Clone)]
pub struct FieldBinding {
	model: Arc<ModelMeta>,
	field_name: String,
	kind: FieldKind,
	attr_label: String,
	order_field: Option<String>,
	field_type: Option<FieldType>,
	target: Option<Arc<ModelMeta>>,
	reverse_name: Option<String>,
	local_key: Option<String>,
	via_m2m: bool,
	remote_field_label: Option<String>,
}

impl FieldBinding {
	/// Resolve `field_name` on `model`
	///
	/// Direct fields are looked up first; anything else is tried as a
	/// reverse accessor. Unknown names are an error rather than a blank
	/// column.
	pub fn resolve(
		schema: &SchemaRegistry,
		model: &str,
		field_name: &str,
	) -> AdminBrowseResult<Self> {
		let meta = schema.get(model)?;

		if let Some(field) = meta.field(field_name) {
			let attr_label = field.label();
			return match (field.field_type, &field.relation) {
				(FieldType::ForeignKey, Some(relation)) => Ok(Self {
					target: Some(schema.get(&relation.to)?),
					model: meta.clone(),
					field_name: field_name.to_string(),
					kind: FieldKind::ToOneDirect,
					attr_label,
					order_field: Some(field_name.to_string()),
					field_type: Some(field.field_type),
					reverse_name: None,
					local_key: None,
					via_m2m: false,
					remote_field_label: None,
				}),
				(FieldType::ManyToMany, Some(relation)) => {
					let reverse_name = relation
						.related_name
						.clone()
						.unwrap_or_else(|| format!("{}_set", meta.model_name()));
					Ok(Self {
						target: Some(schema.get(&relation.to)?),
						local_key: Some(meta.pk_field().to_string()),
						model: meta.clone(),
						field_name: field_name.to_string(),
						kind: FieldKind::ToManyDirect,
						attr_label,
						order_field: None,
						field_type: Some(field.field_type),
						reverse_name: Some(reverse_name),
						via_m2m: true,
						remote_field_label: None,
					})
				}
				_ => Ok(Self {
					model: meta.clone(),
					field_name: field_name.to_string(),
					kind: FieldKind::Scalar,
					attr_label,
					order_field: Some(field_name.to_string()),
					field_type: Some(field.field_type),
					target: None,
					reverse_name: None,
					local_key: None,
					via_m2m: false,
					remote_field_label: None,
				}),
			};
		}

		if let Some(descriptor) = schema.reverse_descriptor(&meta, field_name) {
			return Ok(Self {
				model: meta.clone(),
				field_name: field_name.to_string(),
				kind: FieldKind::ToManyReverse,
				attr_label: crate::text::default_verbose_name(&descriptor.accessor),
				order_field: None,
				field_type: None,
				target: Some(descriptor.owner.clone()),
				reverse_name: Some(descriptor.field_name),
				local_key: Some(descriptor.local_key),
				via_m2m: descriptor.many_to_many,
				remote_field_label: Some(descriptor.field_label),
			});
		}

		Err(AdminBrowseError::UnknownField {
			model: model.to_string(),
			field: field_name.to_string(),
		})
	}

	pub fn model(&self) -> &ModelMeta {
		&self.model
	}

	pub fn field_name(&self) -> &str {
		&self.field_name
	}

	pub fn kind(&self) -> FieldKind {
		self.kind
	}

	/// Human label of the bound attribute
	pub fn attr_label(&self) -> &str {
		&self.attr_label
	}

	pub fn order_field(&self) -> Option<&str> {
		self.order_field.as_deref()
	}

	pub fn field_type(&self) -> Option<FieldType> {
		self.field_type
	}

	/// Related model, for relation shapes
	pub fn target(&self) -> Option<&Arc<ModelMeta>> {
		self.target.as_ref()
	}

	/// Changelist filter prefix on the related side, for to-many shapes
	pub fn reverse_name(&self) -> Option<&str> {
		self.reverse_name.as_deref()
	}

	/// Record attribute holding the filter value, for to-many shapes
	pub fn local_key(&self) -> Option<&str> {
		self.local_key.as_deref()
	}

	pub fn via_m2m(&self) -> bool {
		self.via_m2m
	}

	/// Label of the remote relation field, for reverse shapes
	pub fn remote_field_label(&self) -> Option<&str> {
		self.remote_field_label.as_deref()
	}

	/// Raw value of the bound attribute in `record`
	pub fn value<'a>(&self, record: &'a Record) -> Option<&'a Value> {
		record.get(&self.field_name)
	}

	/// Plain text of the bound attribute, `None` when blank
	///
	/// To-many values join their item texts with `", "`; related objects
	/// render through the target model's display field.
	pub fn value_text(&self, record: &Record) -> Option<String> {
		let value = self.value(record);
		if is_blank(value) {
			return None;
		}
		Some(match value? {
			Value::Array(items) => items
				.iter()
				.map(|item| self.item_text(item))
				.collect::<Vec<_>>()
				.join(", "),
			other => self.item_text(other),
		})
	}

	/// Item texts of a to-many attribute
	pub fn items_text(&self, record: &Record) -> Vec<String> {
		related_items(self.value(record))
			.iter()
			.map(|item| self.item_text(item))
			.collect()
	}

	fn item_text(&self, value: &Value) -> String {
		match &self.target {
			Some(target) => display_text(target, value),
			None => scalar_text(value),
		}
	}
}

/// Plain text column over any attribute
#[derive(Debug)]
pub struct FieldColumn {
	binding: FieldBinding,
	label: String,
	default: String,
}

impl FieldColumn {
	pub fn new(schema: &SchemaRegistry, model: &str, field: &str) -> AdminBrowseResult<Self> {
		let binding = FieldBinding::resolve(schema, model, field)?;
		let label = binding.attr_label().to_string();
		Ok(Self {
			binding,
			label,
			default: String::new(),
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
}

impl ListColumn for FieldColumn {
	fn label(&self) -> &str {
		&self.label
	}

	fn order_field(&self) -> Option<&str> {
		self.binding.order_field()
	}

	fn render(&self, record: &Record) -> AdminBrowseResult<String> {
		Ok(self
			.binding
			.value_text(record)
			.unwrap_or_else(|| self.default.clone()))
	}
}

/// Column rendering an arbitrary template against the whole record
///
/// The template sees `column` and `object` plus any extra context values.
#[derive(Debug)]
pub struct TemplateColumn {
	label: String,
	template_name: String,
	default: String,
	extra_context: HashMap<String, Value>,
	templates: ColumnTemplates,
}

impl TemplateColumn {
	pub fn new(label: impl Into<String>, template_name: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			template_name: template_name.into(),
			default: String::new(),
			extra_context: HashMap::new(),
			templates: ColumnTemplates::default(),
		}
	}

	pub fn with_default(mut self, default: impl Into<String>) -> Self {
		self.default = default.into();
		self
	}

	pub fn with_templates(mut self, templates: ColumnTemplates) -> Self {
		self.templates = templates;
		self
	}

	pub fn with_context_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.extra_context.insert(key.into(), value);
		self
	}
}

impl ListColumn for TemplateColumn {
	fn label(&self) -> &str {
		&self.label
	}

	fn is_safe(&self) -> bool {
		true
	}

	fn render(&self, record: &Record) -> AdminBrowseResult<String> {
		let mut context = Context::new();
		context.insert(
			"column",
			&ColumnContext {
				label: self.label.clone(),
				default: self.default.clone(),
			},
		);
		context.insert("object", &Value::Object(record.clone()));
		for (key, value) in &self.extra_context {
			context.insert(key, value);
		}
		self.templates.render(&self.template_name, &context)
	}
}

/// Column rendering a URL field as an external link
///
/// Opens in a new window by default and carries the `external` CSS class.
#[derive(Debug)]
pub struct UrlColumn {
	binding: FieldBinding,
	label: String,
	default: String,
	target: String,
	classes: Vec<String>,
}

impl UrlColumn {
	pub fn new(schema: &SchemaRegistry, model: &str, field: &str) -> AdminBrowseResult<Self> {
		let binding = FieldBinding::resolve(schema, model, field)?;
		if binding.kind() != FieldKind::Scalar {
			return Err(AdminBrowseError::NotScalar {
				model: model.to_string(),
				field: field.to_string(),
			});
		}
		let label = binding.attr_label().to_string();
		Ok(Self {
			binding,
			label,
			default: String::new(),
			target: "_blank".to_string(),
			classes: vec!["external".to_string()],
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

	pub fn with_target(mut self, target: impl Into<String>) -> Self {
		self.target = target.into();
		self
	}

	pub fn with_classes<I, S>(mut self, classes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.classes = classes.into_iter().map(Into::into).collect();
		self
	}
}

impl ListColumn for UrlColumn {
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
		let Some(url) = self.binding.value_text(record) else {
			return Ok(self.default.clone());
		};
		let title = if self.target == "_blank" {
			"Open URL in a new window"
		} else {
			"Open URL"
		};
		Ok(format_html(
			"<a href=\"{url}\" target=\"{target}\" class=\"{classes}\" title=\"{title}\">{text}</a>",
			&[
				("url", &url),
				("target", &self.target),
				("classes", &self.classes.join(" ")),
				("title", title),
				("text", &url),
			],
		))
	}
}

/// Column rendering text cut at a character count
#[derive(Debug)]
pub struct TruncatedColumn {
	binding: FieldBinding,
	label: String,
	default: String,
	max_length: usize,
	tail: String,
}

impl TruncatedColumn {
	pub fn new(
		schema: &SchemaRegistry,
		model: &str,
		field: &str,
		max_length: usize,
	) -> AdminBrowseResult<Self> {
		let binding = FieldBinding::resolve(schema, model, field)?;
		let label = binding.attr_label().to_string();
		Ok(Self {
			binding,
			label,
			default: String::new(),
			max_length,
			tail: "…".to_string(),
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

	pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
		self.tail = tail.into();
		self
	}
}

impl ListColumn for TruncatedColumn {
	fn label(&self) -> &str {
		&self.label
	}

	fn order_field(&self) -> Option<&str> {
		self.binding.order_field()
	}

	fn render(&self, record: &Record) -> AdminBrowseResult<String> {
		Ok(self
			.binding
			.value_text(record)
			.map(|text| truncate_chars(&text, self.max_length, &self.tail))
			.unwrap_or_else(|| self.default.clone()))
	}
}
