//! Relation column integration tests
//!
//! Covers the link columns across every relation shape the schema can
//! express:
//! - Change-form links for foreign keys, with blank handling
//! - Filtered changelist links for reverse foreign keys, direct and
//!   reverse many-to-many accessors
//! - Link text variants (count, literal, computed)
//! - Related-object lists with separators and defaults
//! - Template overrides through a host-supplied engine

mod common;
use common::{library_schema, library_site, record};

use adminbrowse::schema::SchemaRegistry;
use adminbrowse::{
	link_to_change, link_to_changelist, related_list, BrowseSite, ColumnTemplates, ListColumn,
	Record, CHANGE_LINK_TEMPLATE,
};
use rstest::*;
use serde_json::json;
use std::sync::Arc;
use tera::Tera;

// =============================================================================
// Row fixtures
// =============================================================================

fn twain() -> Record {
	record(json!({
		"pid": 1,
		"name": "Mark Twain",
		"website": "http://www.marktwainproject.org/",
		"bibliography": [],
	}))
}

fn hemingway() -> Record {
	record(json!({
		"pid": 2,
		"name": "Ernest Hemingway",
		"website": "",
		"bibliography": [
			{"bid": 1, "title": "For Whom the Bell Tolls"},
			{"bid": 2, "title": "A Farewell to Arms"},
			{"bid": 6, "title": "The Old Man and the Sea"},
		],
	}))
}

fn vonnegut() -> Record {
	record(json!({
		"pid": 3,
		"name": "Kurt Vonnegut",
		"website": "http://www.vonnegut.com/",
		"bibliography": [
			{"bid": 3, "title": "Cat's Cradle"},
			{"bid": 4, "title": "Slaughterhouse-Five"},
		],
	}))
}

fn bell_tolls() -> Record {
	record(json!({
		"bid": 1,
		"title": "For Whom the Bell Tolls",
		"author": {"pid": 2, "name": "Ernest Hemingway"},
	}))
}

fn war_book() -> Record {
	record(json!({
		"bid": 5,
		"title": "Slaughterhouse-Five",
		"author": {"pid": 3, "name": "Kurt Vonnegut"},
		"categories": [
			{"gid": 2, "label": "War"},
			{"gid": 3, "label": "Science Fiction"},
		],
	}))
}

fn satire_genre() -> Record {
	record(json!({
		"gid": 1,
		"label": "Satire",
		"collection": [
			{"bid": 3, "title": "Cat's Cradle"},
			{"bid": 4, "title": "Slaughterhouse-Five"},
			{"bid": 7, "title": "A Connecticut Yankee in King Arthur's Court"},
		],
	}))
}

fn sea_genre() -> Record {
	record(json!({
		"gid": 4,
		"label": "Sea Stories",
		"collection": [{"bid": 6, "title": "The Old Man and the Sea"}],
	}))
}

// =============================================================================
// Change-form links
// =============================================================================

#[rstest]
fn test_change_link_golden(library_site: BrowseSite) {
	let column = link_to_change(&library_site, "library.book", "author").unwrap();
	assert_eq!(
		column.render(&bell_tolls()).unwrap(),
		"<span class=\"change-link\"><a href=\"/foo/admin/bar/library/person/2/\" \
		 title=\"Go to author\"></a> Ernest Hemingway</span>"
	);
	assert_eq!(column.label(), "author");
	assert!(column.is_safe());
}

#[rstest]
fn test_change_link_blank_renders_default(library_site: BrowseSite) {
	let column = link_to_change(&library_site, "library.book", "author")
		.unwrap()
		.with_default("(anonymous)");
	let row = record(json!({"bid": 8, "title": "Beowulf", "author": null}));
	assert_eq!(column.render(&row).unwrap(), "(anonymous)");
}

#[rstest]
fn test_change_link_context_matches_render(library_site: BrowseSite) {
	let column = link_to_change(&library_site, "library.book", "author").unwrap();
	let context = column.link_context(&bell_tolls()).unwrap();
	assert_eq!(context.value.as_deref(), Some("Ernest Hemingway"));
	assert_eq!(
		context.url.as_deref(),
		Some("/foo/admin/bar/library/person/2/")
	);
	assert_eq!(context.title.as_deref(), Some("Go to author"));

	let html = column.render(&bell_tolls()).unwrap();
	assert!(html.contains("/foo/admin/bar/library/person/2/"));
	assert!(html.contains("Ernest Hemingway"));
}

// =============================================================================
// Changelist links
// =============================================================================

#[rstest]
fn test_changelist_link_count_golden(library_site: BrowseSite) {
	let column = link_to_changelist(&library_site, "library.person", "bibliography").unwrap();
	assert_eq!(
		column.render(&hemingway()).unwrap(),
		"<span class=\"changelist-link\">\
		 <a href=\"/foo/admin/bar/library/book/?author__pid__exact=2\" \
		 title=\"List books with this author\">3</a></span>"
	);
	assert_eq!(column.label(), "bibliography");
}

#[rstest]
fn test_changelist_link_counts_per_row(library_site: BrowseSite) {
	let column = link_to_changelist(&library_site, "library.person", "bibliography").unwrap();
	let context = column.link_context(&vonnegut()).unwrap();
	assert_eq!(context.text, json!(2));
	assert_eq!(
		context.url.as_deref(),
		Some("/foo/admin/bar/library/book/?author__pid__exact=3")
	);
}

#[rstest]
fn test_changelist_link_empty_renders_default(library_site: BrowseSite) {
	let column = link_to_changelist(&library_site, "library.person", "bibliography")
		.unwrap()
		.with_default("(no books)");
	assert_eq!(column.render(&twain()).unwrap(), "(no books)");
}

#[rstest]
fn test_changelist_link_literal_text(library_site: BrowseSite) {
	let column = link_to_changelist(&library_site, "library.person", "bibliography")
		.unwrap()
		.with_text("browse");
	assert_eq!(
		column.render(&hemingway()).unwrap(),
		"<span class=\"changelist-link\">\
		 <a href=\"/foo/admin/bar/library/book/?author__pid__exact=2\" \
		 title=\"List books with this author\">browse</a></span>"
	);
}

#[rstest]
fn test_changelist_link_computed_text(library_site: BrowseSite) {
	let column = link_to_changelist(&library_site, "library.person", "bibliography")
		.unwrap()
		.with_text_fn(|items| format!("{} books", items.len()));
	let context = column.link_context(&hemingway()).unwrap();
	assert_eq!(context.text, json!("3 books"));
}

#[rstest]
fn test_changelist_link_direct_m2m(library_site: BrowseSite) {
	let column = link_to_changelist(&library_site, "library.book", "categories").unwrap();
	assert_eq!(
		column.render(&war_book()).unwrap(),
		"<span class=\"changelist-link\">\
		 <a href=\"/foo/admin/bar/library/genre/?collection__bid__exact=5\" \
		 title=\"List genres with this book\">2</a></span>"
	);
}

#[rstest]
fn test_changelist_link_reverse_m2m(library_site: BrowseSite) {
	let column = link_to_changelist(&library_site, "library.genre", "collection").unwrap();
	let context = column.link_context(&satire_genre()).unwrap();
	assert_eq!(context.text, json!(3));
	assert_eq!(
		context.url.as_deref(),
		Some("/foo/admin/bar/library/book/?categories__gid__exact=1")
	);
	assert_eq!(context.title.as_deref(), Some("List books with this genre"));
}

#[rstest]
fn test_changelist_link_default_accessor(library_site: BrowseSite) {
	let column = link_to_changelist(&library_site, "library.person", "note_set").unwrap();
	assert_eq!(column.label(), "note set");
	let row = record(json!({"pid": 1, "note_set": [{"id": 9, "body": "check sources"}]}));
	let context = column.link_context(&row).unwrap();
	assert_eq!(
		context.url.as_deref(),
		Some("/foo/admin/bar/library/note/?person__pid__exact=1")
	);
	assert_eq!(context.title.as_deref(), Some("List notes with this person"));
}

// =============================================================================
// Related lists
// =============================================================================

#[rstest]
fn test_related_list_joins_display_text(library_schema: SchemaRegistry) {
	let column = related_list(&library_schema, "library.person", "bibliography").unwrap();
	assert_eq!(
		column.render(&vonnegut()).unwrap(),
		"Cat's Cradle, Slaughterhouse-Five"
	);
	assert!(!column.is_safe());
}

#[rstest]
fn test_related_list_custom_separator(library_schema: SchemaRegistry) {
	let column = related_list(&library_schema, "library.person", "bibliography")
		.unwrap()
		.with_separator(" ~ ");
	assert_eq!(
		column.render(&vonnegut()).unwrap(),
		"Cat's Cradle ~ Slaughterhouse-Five"
	);
}

#[rstest]
fn test_related_list_single_item(library_schema: SchemaRegistry) {
	let column = related_list(&library_schema, "library.genre", "collection").unwrap();
	assert_eq!(
		column.render(&sea_genre()).unwrap(),
		"The Old Man and the Sea"
	);
}

#[rstest]
fn test_related_list_empty_renders_default(library_schema: SchemaRegistry) {
	let column = related_list(&library_schema, "library.person", "bibliography")
		.unwrap()
		.with_default("(nothing yet)");
	assert_eq!(column.render(&twain()).unwrap(), "(nothing yet)");
}

#[rstest]
fn test_related_list_direct_m2m(library_schema: SchemaRegistry) {
	let column = related_list(&library_schema, "library.book", "categories").unwrap();
	assert_eq!(column.render(&war_book()).unwrap(), "War, Science Fiction");
}

// =============================================================================
// Template overrides and column building
// =============================================================================

#[rstest]
fn test_change_link_custom_template(library_site: BrowseSite) {
	let mut tera = Tera::default();
	tera.add_raw_template(
		CHANGE_LINK_TEMPLATE,
		"{% if value %}<b>{{ value }}</b>{% else %}-{% endif %}",
	)
	.unwrap();
	let site = library_site.with_templates(ColumnTemplates::with_tera(Arc::new(tera)));

	let column = link_to_change(&site, "library.book", "author").unwrap();
	assert_eq!(column.render(&bell_tolls()).unwrap(), "<b>Ernest Hemingway</b>");
}

#[rstest]
fn test_build_columns_fk_becomes_change_link(library_site: BrowseSite) {
	let columns = library_site
		.build_columns("library.book", &["title", "author"])
		.unwrap();
	let html = columns[1].render(&bell_tolls()).unwrap();
	assert!(html.contains("href=\"/foo/admin/bar/library/person/2/\""));
	assert!(html.contains("title=\"Go to author\""));
}
