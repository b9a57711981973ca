//! Shared fixtures for column integration tests
//!
//! A small library schema: people write books, books carry genres, and a
//! note model points at people without a declared reverse accessor.

use adminbrowse::schema::{FieldMeta, FieldType, ModelMeta, SchemaRegistry};
use adminbrowse::urls::{register_admin_routes, UrlReverser};
use adminbrowse::{BrowseSite, Record};
use rstest::*;
use serde_json::Value;

/// Schema with person, book, genre and note models
#[fixture]
pub fn library_schema() -> SchemaRegistry {
	let mut schema = SchemaRegistry::new();
	schema.register(
		ModelMeta::new("library", "person")
			.with_pk_field("pid")
			.with_display_field("name")
			.with_field(FieldMeta::new("pid", FieldType::Auto))
			.with_field(FieldMeta::new("name", FieldType::Char))
			.with_field(FieldMeta::new("website", FieldType::Url).with_verbose_name("home page")),
	);
	schema.register(
		ModelMeta::new("library", "genre")
			.with_pk_field("gid")
			.with_display_field("label")
			.with_field(FieldMeta::new("gid", FieldType::Auto))
			.with_field(FieldMeta::new("label", FieldType::Char)),
	);
	schema.register(
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
			),
	);
	schema.register(
		ModelMeta::new("library", "note")
			.with_field(FieldMeta::new("id", FieldType::Auto))
			.with_field(FieldMeta::new("body", FieldType::Text))
			.with_field(FieldMeta::foreign_key("person", "library.person")),
	);
	schema
}

/// Site mounted under a nested path, to catch hardcoded URL assumptions
#[fixture]
pub fn library_site() -> BrowseSite {
	let schema = library_schema();
	let mut urls = UrlReverser::new();
	register_admin_routes(&mut urls, "admin", "/foo/admin/bar/", &schema);
	BrowseSite::new(schema, urls)
}

/// Shorthand turning a `json!` object into a record
pub fn record(value: Value) -> Record {
	match value {
		Value::Object(map) => map,
		_ => panic!("record fixtures must be JSON objects"),
	}
}
