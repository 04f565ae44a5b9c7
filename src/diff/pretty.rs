//! Structural comparison of serializable values.
//!
//! Both sides are rendered to JSON, zero-valued fields (`null`, `""`, `0`,
//! `false`, empty lists and maps) are dropped, and the remaining trees are
//! walked together. Each differing leaf yields a `path: -old` and/or
//! `path: +new` line.

use log::error;
use serde::Serialize;
use serde_json::{Map, Value};

/// Empty string when `current` and `desired` agree on every non-zero field.
pub fn compare<T: Serialize + ?Sized>(current: Option<&T>, desired: Option<&T>) -> String {
    let current = current.map(to_pruned_value).unwrap_or(Value::Null);
    let desired = desired.map(to_pruned_value).unwrap_or(Value::Null);

    let mut lines = Vec::new();
    diff_values("", &current, &desired, &mut lines);
    lines.join("\n")
}

fn to_pruned_value<T: Serialize + ?Sized>(value: &T) -> Value {
    match serde_json::to_value(value) {
        Ok(value) => prune(value),
        Err(err) => {
            error!("Unable to serialize value for comparison: {}", err);
            Value::Null
        }
    }
}

fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

fn prune(value: Value) -> Value {
    let pruned = match value {
        Value::Object(fields) => {
            let fields: Map<String, Value> = fields
                .into_iter()
                .map(|(key, value)| (key, prune(value)))
                .filter(|(_, value)| !value.is_null())
                .collect();
            Value::Object(fields)
        }
        // list entries keep their position, only their insides are pruned
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(_) | Value::Array(_) => prune(item),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    };
    if is_zero(&pruned) {
        Value::Null
    } else {
        pruned
    }
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_owned()
    } else {
        format!("{}.{}", path, key)
    }
}

fn push_line(lines: &mut Vec<String>, path: &str, sign: char, value: &Value) {
    if path.is_empty() {
        lines.push(format!("{}{}", sign, value));
    } else {
        lines.push(format!("{}: {}{}", path, sign, value));
    }
}

fn diff_values(path: &str, current: &Value, desired: &Value, lines: &mut Vec<String>) {
    if current == desired {
        return;
    }
    // a missing map or list is walked as an empty one so additions are reported per field
    let empty_map = Value::Object(Map::new());
    let empty_list = Value::Array(Vec::new());
    let (current, desired) = match (current, desired) {
        (Value::Null, Value::Object(_)) => (&empty_map, desired),
        (Value::Object(_), Value::Null) => (current, &empty_map),
        (Value::Null, Value::Array(_)) => (&empty_list, desired),
        (Value::Array(_), Value::Null) => (current, &empty_list),
        _ => (current, desired),
    };
    match (current, desired) {
        (Value::Object(current), Value::Object(desired)) => {
            let mut keys: Vec<&String> = current.keys().chain(desired.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                diff_values(
                    &child_path(path, key),
                    current.get(key.as_str()).unwrap_or(&Value::Null),
                    desired.get(key.as_str()).unwrap_or(&Value::Null),
                    lines,
                );
            }
        }
        (Value::Array(current), Value::Array(desired)) => {
            for index in 0..current.len().max(desired.len()) {
                diff_values(
                    &format!("{}[{}]", path, index),
                    current.get(index).unwrap_or(&Value::Null),
                    desired.get(index).unwrap_or(&Value::Null),
                    lines,
                );
            }
        }
        _ => {
            if !current.is_null() {
                push_line(lines, path, '-', current);
            }
            if !desired.is_null() {
                push_line(lines, path, '+', desired);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equal_values_have_no_diff() {
        let a = json!({"name": "web", "replicas": 2});
        assert_eq!(compare(Some(&a), Some(&a.clone())), "");
        assert_eq!(compare::<Value>(None, None), "");
    }

    #[test]
    fn test_zero_fields_are_ignored() {
        let current = json!({"name": "web", "version": "", "replicas": 0, "ssl": false, "env": []});
        let desired = json!({"name": "web", "annotations": {}, "probe": null});
        assert_eq!(compare(Some(&current), Some(&desired)), "");
    }

    #[test]
    fn test_changed_leaf() {
        let current = json!({"name": "web", "version": "1.0"});
        let desired = json!({"name": "web", "version": "2.0"});
        assert_eq!(
            compare(Some(&current), Some(&desired)),
            "version: -\"1.0\"\nversion: +\"2.0\""
        );
    }

    #[test]
    fn test_nested_and_list_changes() {
        let current = json!({"requests": {"cpu": "100m"}, "external_url": ["a.com"]});
        let desired = json!({"requests": {"cpu": "200m"}, "external_url": ["a.com", "b.com"]});
        let diff = compare(Some(&current), Some(&desired));
        assert!(diff.contains("requests.cpu: -\"100m\""));
        assert!(diff.contains("requests.cpu: +\"200m\""));
        assert!(diff.contains("external_url[1]: +\"b.com\""));
        assert!(!diff.contains("external_url[0]"));
    }

    #[test]
    fn test_against_nothing() {
        let desired = json!({"name": "web"});
        assert_eq!(compare(None, Some(&desired)), "name: +\"web\"");
        assert_eq!(compare(Some(&desired), None), "name: -\"web\"");
    }

    #[test]
    fn test_scalar_root() {
        assert_eq!(compare(Some("svc-blue"), Some("svc-green")), "-\"svc-blue\"\n+\"svc-green\"");
    }
}
