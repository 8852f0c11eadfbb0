//! Client grid configuration and server-side responses
//!
//! The browser widget is initialised from a JSON object of the shape
//! `{columnDefs, ordering, ...attribs, processing?, serverSide?, ajax?, columns?}`.
//! Table attributes are merged into it; a table attribute named like a
//! fixed key replaces it in place.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::column::ColumnParams;
use crate::error::TableResult;

/// HTTP method used when none is configured
pub const DEFAULT_AJAX_METHOD: &str = "GET";

/// Grid initialisation options
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
	/// Always empty; columns are described through `columns`
	pub column_defs: Vec<Value>,
	/// Client-side sorting, off by default
	pub ordering: bool,
	/// Table attributes, merged as is
	#[serde(flatten)]
	pub attribs: IndexMap<String, Value>,
	/// Set when data is loaded through AJAX
	#[serde(skip_serializing_if = "Option::is_none")]
	pub processing: Option<bool>,
	/// Set when data is loaded through AJAX
	#[serde(skip_serializing_if = "Option::is_none")]
	pub server_side: Option<bool>,
	/// Data endpoint, omitted when pages are cached through the pipeline
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ajax: Option<AjaxConfig>,
	/// One definition per rendered element
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub columns: Vec<ColumnParams>,
}

impl GridConfig {
	/// Configuration for `attribs` and the given data source
	pub fn new(attribs: IndexMap<String, Value>, source: Option<&DataSource>, columns: Vec<ColumnParams>) -> Self {
		let mut config = Self {
			attribs,
			columns,
			..Self::default()
		};
		if let Some(source) = source {
			config.processing = Some(true);
			config.server_side = Some(true);
			if source.cache_pages == 0 {
				config.ajax = Some(AjaxConfig {
					url: source.url.clone(),
					method: source.method.clone(),
				});
			}
		}
		config
	}

	/// JSON object text
	///
	/// Attribute keys that repeat a fixed key are collapsed into one entry.
	pub fn to_json(&self) -> TableResult<String> {
		let value = serde_json::to_value(self)?;
		Ok(serde_json::to_string(&value)?)
	}
}

/// Where the grid loads its rows from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
	/// Endpoint URL
	pub url: String,
	/// HTTP method, upper case
	pub method: String,
	/// Pages fetched ahead through the pipeline, `0` disables caching
	pub cache_pages: u32,
}

impl DataSource {
	/// Pipeline options, when caching is enabled
	pub fn pipeline(&self) -> Option<PipelineConfig> {
		(self.cache_pages > 0).then(|| PipelineConfig {
			pages: self.cache_pages,
			url: self.url.clone(),
			method: self.method.clone(),
		})
	}
}

/// `ajax` block of the grid options
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AjaxConfig {
	/// Endpoint URL
	pub url: String,
	/// HTTP method
	#[serde(rename = "type")]
	pub method: String,
}

/// Options of the client-side page cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineConfig {
	/// Pages to fetch per request
	pub pages: u32,
	/// Endpoint URL
	pub url: String,
	/// HTTP method
	pub method: String,
}

/// Body answering a server-side grid request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerResponse<'a> {
	/// Request counter echoed back to the client
	pub draw: u64,
	/// Rows before filtering
	pub records_total: usize,
	/// Rows after filtering
	pub records_filtered: usize,
	/// Row data
	pub data: &'a [Value],
}
