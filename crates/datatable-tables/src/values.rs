//! Aggregation of element values into one nested map

use serde_json::{Map, Value};

/// Nest `value` under the keys of an array notation path
///
/// # Examples
///
/// ```
/// use datatable_tables::values::attach_to_array;
/// use serde_json::json;
///
/// assert_eq!(attach_to_array(json!(1), "id"), json!({"id": 1}));
/// assert_eq!(
///     attach_to_array(json!("x"), "grid[filters][name]"),
///     json!({"grid": {"filters": {"name": "x"}}})
/// );
/// ```
pub fn attach_to_array(value: Value, path: &str) -> Value {
	let mut value = value;
	let mut path = path;

	while let Some(pos) = path.rfind('[').filter(|pos| *pos > 0) {
		let key = path[pos + 1..].trim_matches(']');
		value = single(key, value);
		path = path[..pos].trim_matches(']');
	}

	single(path, value)
}

/// Merge `from` into `into`, replacing scalars and descending into maps and lists
pub fn merge_recursive(into: &mut Value, from: Value) {
	match (into, from) {
		(Value::Object(target), Value::Object(source)) => {
			for (key, incoming) in source {
				match target.get_mut(&key) {
					Some(existing) => merge_recursive(existing, incoming),
					None => {
						target.insert(key, incoming);
					}
				}
			}
		}
		(Value::Array(target), Value::Array(source)) => {
			for (index, incoming) in source.into_iter().enumerate() {
				match target.get_mut(index) {
					Some(existing) => merge_recursive(existing, incoming),
					None => target.push(incoming),
				}
			}
		}
		(slot, incoming) => *slot = incoming,
	}
}

fn single(key: &str, value: Value) -> Value {
	let mut map = Map::new();
	map.insert(key.to_string(), value);
	Value::Object(map)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_attach_plain_key() {
		assert_eq!(attach_to_array(json!([1, 2]), "ids"), json!({"ids": [1, 2]}));
	}

	#[test]
	fn test_attach_nested_path() {
		assert_eq!(
			attach_to_array(json!(true), "a[b][c]"),
			json!({"a": {"b": {"c": true}}})
		);
	}

	#[test]
	fn test_merge_recursive_combines_maps() {
		let mut into = json!({"grid": {"name": "a"}, "keep": 1});
		merge_recursive(&mut into, json!({"grid": {"desc": "b"}, "keep": 2}));
		assert_eq!(into, json!({"grid": {"name": "a", "desc": "b"}, "keep": 2}));
	}

	#[test]
	fn test_merge_recursive_replaces_by_index() {
		let mut into = json!([1, 2, 3]);
		merge_recursive(&mut into, json!([9]));
		assert_eq!(into, json!([9, 2, 3]));
	}

	#[test]
	fn test_merge_recursive_scalar_over_map() {
		let mut into = json!({"a": {"b": 1}});
		merge_recursive(&mut into, json!({"a": null}));
		assert_eq!(into, json!({"a": null}));
	}
}
