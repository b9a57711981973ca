//! Error types for browse columns

use thiserror::Error;

/// Column configuration and rendering error type
#[derive(Debug, Error)]
pub enum AdminBrowseError {
	/// Model key not present in the schema registry
	#[error("Model '{0}' is not registered with the schema")]
	ModelNotRegistered(String),

	/// Attribute resolves neither to a field nor to a reverse accessor
	#[error("Model '{model}' has no field or reverse accessor '{field}'")]
	UnknownField { model: String, field: String },

	/// Renderer requires a plain value field
	#[error("Field '{field}' on model '{model}' is not a plain value field")]
	NotScalar { model: String, field: String },

	/// Renderer requires a direct to-one relation
	#[error("Field '{field}' on model '{model}' is not a to-one relation")]
	NotToOne { model: String, field: String },

	/// Renderer requires a to-many relation
	#[error("Field '{field}' on model '{model}' is not a to-many relation")]
	NotToMany { model: String, field: String },

	/// Record lacks an attribute the column must read
	#[error("Record for model '{model}' is missing attribute '{attr}'")]
	MissingAttribute { model: String, attr: String },

	/// No route registered under the requested name
	#[error("No route registered for '{0}'")]
	RouteNotFound(String),

	/// Route pattern parameter absent from the reversal call
	#[error("Missing parameter '{param}' for route '{route}'")]
	MissingRouteParam { route: String, param: String },

	/// Template rendering error
	#[error("Template rendering error: {0}")]
	Template(String),
}

/// Result type for browse column operations
pub type AdminBrowseResult<T> = Result<T, AdminBrowseError>;
