//! Entity schema metadata
//!
//! Columns resolve their bound attributes against this registry once, at
//! construction time. The host framework owns the metadata; columns read it
//! and never mutate it.

use crate::error::{AdminBrowseError, AdminBrowseResult};
use crate::text::default_verbose_name;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Field type classification used by column construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
	Auto,
	Integer,
	Float,
	Boolean,
	Char,
	Text,
	Url,
	Date,
	DateTime,
	ForeignKey,
	ManyToMany,
}

/// Relation details for foreign-key and many-to-many fields
#[derive(Debug, Clone)]
pub struct RelationMeta {
	/// Target model key, `"app_label.model_name"`
	pub to: String,
	/// Reverse accessor declared on the target side
	pub related_name: Option<String>,
	/// Field on the target the relation references; defaults to the target's
	/// primary key
	pub to_field: Option<String>,
}

/// Schema description of one field
#[derive(Debug, Clone)]
pub struct FieldMeta {
	pub name: String,
	pub field_type: FieldType,
	pub verbose_name: Option<String>,
	pub relation: Option<RelationMeta>,
}

impl FieldMeta {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			verbose_name: None,
			relation: None,
		}
	}

	/// Foreign-key field pointing at `to` (`"app_label.model_name"`)
	pub fn foreign_key(name: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			field_type: FieldType::ForeignKey,
			verbose_name: None,
			relation: Some(RelationMeta {
				to: to.into(),
				related_name: None,
				to_field: None,
			}),
		}
	}

	/// Many-to-many field pointing at `to` (`"app_label.model_name"`)
	pub fn many_to_many(name: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			field_type: FieldType::ManyToMany,
			verbose_name: None,
			relation: Some(RelationMeta {
				to: to.into(),
				related_name: None,
				to_field: None,
			}),
		}
	}

	pub fn with_verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
		self.verbose_name = Some(verbose_name.into());
		self
	}

	/// Reverse accessor name on the target side; meaningful on relation fields
	pub fn with_related_name(mut self, related_name: impl Into<String>) -> Self {
		if let Some(relation) = &mut self.relation {
			relation.related_name = Some(related_name.into());
		}
		self
	}

	/// Referenced field on the target side; meaningful on relation fields
	pub fn with_to_field(mut self, to_field: impl Into<String>) -> Self {
		if let Some(relation) = &mut self.relation {
			relation.to_field = Some(to_field.into());
		}
		self
	}

	/// Human label: the declared verbose name, else the field name with
	/// underscores as spaces
	pub fn label(&self) -> String {
		self.verbose_name
			.clone()
			.unwrap_or_else(|| default_verbose_name(&self.name))
	}

	pub fn is_relation(&self) -> bool {
		self.relation.is_some()
	}
}

/// Schema description of one model
///
/// Verbose names derive from the model name unless declared, matching the
/// framework defaults (`"book"` → `"book"` / `"books"`).
#[derive(Debug, Clone)]
pub struct ModelMeta {
	app_label: String,
	model_name: String,
	verbose_name: Option<String>,
	verbose_name_plural: Option<String>,
	pk_field: String,
	display_field: Option<String>,
	fields: Vec<FieldMeta>,
}

impl ModelMeta {
	pub fn new(app_label: impl Into<String>, model_name: impl Into<String>) -> Self {
		Self {
			app_label: app_label.into(),
			model_name: model_name.into(),
			verbose_name: None,
			verbose_name_plural: None,
			pk_field: "id".to_string(),
			display_field: None,
			fields: Vec::new(),
		}
	}

	pub fn with_verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
		self.verbose_name = Some(verbose_name.into());
		self
	}

	pub fn with_verbose_name_plural(mut self, verbose_name_plural: impl Into<String>) -> Self {
		self.verbose_name_plural = Some(verbose_name_plural.into());
		self
	}

	pub fn with_pk_field(mut self, pk_field: impl Into<String>) -> Self {
		self.pk_field = pk_field.into();
		self
	}

	/// Field whose value stands in for the whole record in display text
	pub fn with_display_field(mut self, display_field: impl Into<String>) -> Self {
		self.display_field = Some(display_field.into());
		self
	}

	pub fn with_field(mut self, field: FieldMeta) -> Self {
		self.fields.push(field);
		self
	}

	/// Registry key, `"app_label.model_name"`
	pub fn key(&self) -> String {
		format!("{}.{}", self.app_label, self.model_name)
	}

	pub fn app_label(&self) -> &str {
		&self.app_label
	}

	pub fn model_name(&self) -> &str {
		&self.model_name
	}

	pub fn pk_field(&self) -> &str {
		&self.pk_field
	}

	pub fn display_field(&self) -> Option<&str> {
		self.display_field.as_deref()
	}

	pub fn verbose_name(&self) -> String {
		self.verbose_name
			.clone()
			.unwrap_or_else(|| default_verbose_name(&self.model_name))
	}

	pub fn verbose_name_plural(&self) -> String {
		self.verbose_name_plural
			.clone()
			.unwrap_or_else(|| format!("{}s", self.verbose_name()))
	}

	pub fn field(&self, name: &str) -> Option<&FieldMeta> {
		self.fields.iter().find(|field| field.name == name)
	}

	pub fn fields(&self) -> &[FieldMeta] {
		&self.fields
	}
}

/// One entry of the reverse-descriptor table
///
/// Describes a relation reachable from its target side through an accessor
/// name: the accessor is the remote field's declared `related_name` or the
/// framework default `{model_name}_set`.
#[derive(Debug, Clone)]
pub struct ReverseDescriptor {
	/// Model declaring the relation field
	pub owner: Arc<ModelMeta>,
	/// Relation field name on the owner
	pub field_name: String,
	/// Human label of the relation field
	pub field_label: String,
	/// Accessor name on the target side
	pub accessor: String,
	/// Field on the target the relation references
	pub local_key: String,
	/// Whether the relation is many-to-many
	pub many_to_many: bool,
}

/// Registry of model metadata keyed by `"app_label.model_name"`
#[derive(Debug, Default)]
pub struct SchemaRegistry {
	models: HashMap<String, Arc<ModelMeta>>,
}

impl SchemaRegistry {
	pub fn new() -> Self {
		Self {
			models: HashMap::new(),
		}
	}

	pub fn register(&mut self, meta: ModelMeta) {
		let key = meta.key();
		debug!(model = %key, "registered model schema");
		self.models.insert(key, Arc::new(meta));
	}

	pub fn get(&self, key: &str) -> AdminBrowseResult<Arc<ModelMeta>> {
		self.models
			.get(key)
			.cloned()
			.ok_or_else(|| AdminBrowseError::ModelNotRegistered(key.to_string()))
	}

	pub fn contains(&self, key: &str) -> bool {
		self.models.contains_key(key)
	}

	pub fn models(&self) -> impl Iterator<Item = &Arc<ModelMeta>> {
		self.models.values()
	}

	/// Look up a reverse accessor on `target`
	///
	/// Scans registered models for a relation field pointing at `target` whose
	/// accessor name matches. Returns `None` when no such relation exists.
	pub fn reverse_descriptor(
		&self,
		target: &ModelMeta,
		accessor: &str,
	) -> Option<ReverseDescriptor> {
		let target_key = target.key();
		for model in self.models.values() {
			for field in model.fields() {
				let Some(relation) = &field.relation else {
					continue;
				};
				if relation.to != target_key {
					continue;
				}
				let name = relation
					.related_name
					.clone()
					.unwrap_or_else(|| format!("{}_set", model.model_name()));
				if name == accessor {
					return Some(ReverseDescriptor {
						owner: model.clone(),
						field_name: field.name.clone(),
						field_label: field.label(),
						accessor: name,
						local_key: relation
							.to_field
							.clone()
							.unwrap_or_else(|| target.pk_field().to_string()),
						many_to_many: field.field_type == FieldType::ManyToMany,
					});
				}
			}
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn book_meta() -> ModelMeta {
		ModelMeta::new("library", "book")
			.with_pk_field("bid")
			.with_display_field("title")
			.with_field(FieldMeta::new("bid", FieldType::Auto))
			.with_field(FieldMeta::new("title", FieldType::Char))
			.with_field(
				FieldMeta::foreign_key("author", "library.person")
					.with_related_name("bibliography"),
			)
			.with_field(
				FieldMeta::many_to_many("categories", "library.genre")
					.with_related_name("collection"),
			)
	}

	#[test]
	fn test_model_meta_key() {
		assert_eq!(book_meta().key(), "library.book");
	}

	#[test]
	fn test_verbose_names_default_from_model_name() {
		let meta = book_meta();
		assert_eq!(meta.verbose_name(), "book");
		assert_eq!(meta.verbose_name_plural(), "books");
	}

	#[test]
	fn test_verbose_names_can_be_declared() {
		let meta = ModelMeta::new("library", "person")
			.with_verbose_name("author")
			.with_verbose_name_plural("authors");
		assert_eq!(meta.verbose_name(), "author");
		assert_eq!(meta.verbose_name_plural(), "authors");
	}

	#[test]
	fn test_field_label_prefers_verbose_name() {
		let field = FieldMeta::new("website", FieldType::Url).with_verbose_name("home page");
		assert_eq!(field.label(), "home page");
		let field = FieldMeta::new("home_page", FieldType::Url);
		assert_eq!(field.label(), "home page");
	}

	#[test]
	fn test_registry_get_unknown_model() {
		let registry = SchemaRegistry::new();
		let err = registry.get("library.missing").unwrap_err();
		assert_eq!(
			err.to_string(),
			"Model 'library.missing' is not registered with the schema"
		);
	}

	#[test]
	fn test_reverse_descriptor_via_related_name() {
		let mut registry = SchemaRegistry::new();
		registry.register(
			ModelMeta::new("library", "person")
				.with_pk_field("pid")
				.with_field(FieldMeta::new("pid", FieldType::Auto)),
		);
		registry.register(book_meta());

		let person = registry.get("library.person").unwrap();
		let descriptor = registry.reverse_descriptor(&person, "bibliography").unwrap();
		assert_eq!(descriptor.owner.key(), "library.book");
		assert_eq!(descriptor.field_name, "author");
		assert_eq!(descriptor.local_key, "pid");
		assert!(!descriptor.many_to_many);
	}

	#[test]
	fn test_reverse_descriptor_via_default_accessor() {
		let mut registry = SchemaRegistry::new();
		registry.register(
			ModelMeta::new("library", "person")
				.with_pk_field("pid")
				.with_field(FieldMeta::new("pid", FieldType::Auto)),
		);
		registry.register(
			ModelMeta::new("library", "note")
				.with_field(FieldMeta::new("id", FieldType::Auto))
				.with_field(FieldMeta::foreign_key("person", "library.person")),
		);

		let person = registry.get("library.person").unwrap();
		let descriptor = registry.reverse_descriptor(&person, "note_set").unwrap();
		assert_eq!(descriptor.owner.key(), "library.note");
		assert_eq!(descriptor.accessor, "note_set");
		assert_eq!(descriptor.local_key, "pid");
	}

	#[test]
	fn test_reverse_descriptor_unknown_accessor() {
		let mut registry = SchemaRegistry::new();
		registry.register(ModelMeta::new("library", "person"));
		let person = registry.get("library.person").unwrap();
		assert!(registry.reverse_descriptor(&person, "bibliography").is_none());
	}

	#[test]
	fn test_reverse_descriptor_many_to_many() {
		let mut registry = SchemaRegistry::new();
		registry.register(
			ModelMeta::new("library", "genre")
				.with_pk_field("gid")
				.with_field(FieldMeta::new("gid", FieldType::Auto)),
		);
		registry.register(book_meta());

		let genre = registry.get("library.genre").unwrap();
		let descriptor = registry.reverse_descriptor(&genre, "collection").unwrap();
		assert_eq!(descriptor.field_name, "categories");
		assert_eq!(descriptor.local_key, "gid");
		assert!(descriptor.many_to_many);
	}
}
