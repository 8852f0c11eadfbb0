//! Data table error types.
//!
//! Every fallible operation of this crate returns [`TableResult`]. Errors are
//! raised synchronously and never retried; the only place that swallows them
//! is the string conversion of a table or element.

use thiserror::Error;

use crate::plugin::PluginType;

/// Result type for data table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Data table errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TableError {
	/// Name is empty after removing disallowed characters.
	#[error(
		"Invalid name provided ('{0}'); must contain only valid variable characters and be non-empty"
	)]
	NameValidation(String),

	/// Two items claim the same explicit position.
	#[error(
		"datatable elements {first} and {second} have the same order ({position}) - this would result in only the last added element to be rendered"
	)]
	OrderConflict {
		/// Item that claimed the position first.
		first: String,
		/// Item that collided with it.
		second: String,
		/// Contested position.
		position: i32,
	},

	/// No decorator matches the requested name.
	#[error("Decorator by name {0} does not exist")]
	UnknownDecorator(String),

	/// Dynamic render dispatch for something that is not a render call.
	#[error("Method {0} does not exist")]
	UnknownMethod(String),

	/// Malformed element, decorator or filter specification.
	#[error("invalid specification: {0}")]
	InvalidSpec(String),

	/// Decorator invoked against an owner it cannot render.
	#[error("decorator {decorator} cannot render {owner}")]
	Binding {
		/// Canonical decorator name.
		decorator: String,
		/// Description of the rejected owner.
		owner: String,
	},

	/// Short kind name not resolvable through the configured prefixes.
	#[error("{plugin_type} plugin by name '{name}' was not found in the registry; used prefixes: {prefixes:?}")]
	PluginResolution {
		/// Requested kind.
		name: String,
		/// Kind of plugin that was looked up.
		plugin_type: PluginType,
		/// Prefixes searched, most recent first.
		prefixes: Vec<String>,
	},

	/// Attribute name is reserved or starts with an underscore.
	#[error("Invalid attribute \"{0}\"; must not contain a leading underscore or shadow a typed field")]
	InvalidAttribute(String),

	/// HTTP method outside of `delete`, `get`, `post` and `put`.
	#[error("\"{0}\" is an invalid form method")]
	InvalidMethod(String),

	/// A renderer needed a view and none was bound.
	#[error("{0} decorator cannot render without a registered view object")]
	ViewUnavailable(String),

	/// The view has no helper of that name.
	#[error("view helper '{0}' is not registered")]
	UnknownHelper(String),

	/// Ordered iteration produced a name that is no longer an element.
	#[error("Corruption detected in datatable; invalid key (\"{0}\") found in internal iterator")]
	CorruptIterator(String),

	/// Settings document could not be parsed.
	#[error("settings error: {0}")]
	Settings(#[from] toml::de::Error),

	/// Settings file could not be read.
	#[error("settings file error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON encoding failed.
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_order_conflict_display() {
		let err = TableError::OrderConflict {
			first: "nome".to_string(),
			second: "desc".to_string(),
			position: 3,
		};
		assert_eq!(
			err.to_string(),
			"datatable elements nome and desc have the same order (3) - this would result in only the last added element to be rendered"
		);
	}

	#[test]
	fn test_unknown_decorator_display() {
		let err = TableError::UnknownDecorator("Label".to_string());
		assert_eq!(err.to_string(), "Decorator by name Label does not exist");
	}

	#[test]
	fn test_unknown_method_display() {
		let err = TableError::UnknownMethod("paint".to_string());
		assert_eq!(err.to_string(), "Method paint does not exist");
	}

	#[test]
	fn test_plugin_resolution_display() {
		let err = TableError::PluginResolution {
			name: "Select".to_string(),
			plugin_type: PluginType::Element,
			prefixes: vec!["DataTable_Element_".to_string()],
		};
		let msg = err.to_string();
		assert!(msg.contains("element plugin by name 'Select'"));
		assert!(msg.contains("DataTable_Element_"));
	}

	#[test]
	fn test_invalid_method_display() {
		let err = TableError::InvalidMethod("patch".to_string());
		assert_eq!(err.to_string(), "\"patch\" is an invalid form method");
	}
}
