//! TOML transcoding: convert between pbxproj values and TOML text.
//!
//! Mapping from TOML to pbxproj:
//!   - TOML string         -> Value::String
//!   - TOML integer/float  -> Value::String (decimal text)
//!   - TOML boolean        -> Value::String ("YES" / "NO")
//!   - TOML datetime       -> Value::String (ISO 8601 representation)
//!   - TOML array          -> Value::Array
//!   - TOML table          -> Value::Mapping
//!
//! Mapping from pbxproj to TOML:
//!   - Value::String       -> TOML string
//!   - Value::Array        -> TOML array (mappings inside become inline tables)
//!   - Value::Mapping      -> TOML table
//!
//! TOML requires the top-level value to be a table; an array root errors.

use libpbxproj::{Mapping, Value};
use toml_edit::DocumentMut;

/// Decode a TOML string into a pbxproj Value.
pub fn decode(input: &str) -> Result<Value, String> {
    let doc: DocumentMut = input
        .parse::<DocumentMut>()
        .map_err(|e| format!("TOML parse error: {}", e))?;
    toml_table_to_value(doc.as_table())
}

/// Encode a pbxproj Value as a TOML string.
pub fn encode(value: &Value) -> Result<String, String> {
    match value {
        Value::Mapping(map) => {
            let mut doc = DocumentMut::new();
            for (key, item) in map.iter() {
                doc[key] = value_to_toml(item);
            }
            Ok(doc.to_string())
        }
        _ => Err(format!(
            "TOML requires the top-level value to be a table, not {}",
            value.kind()
        )),
    }
}

fn toml_table_to_value(table: &toml_edit::Table) -> Result<Value, String> {
    let mut mapping = Mapping::new();
    for (key, item) in table.iter() {
        mapping.insert(key, toml_item_to_value(item)?);
    }
    Ok(Value::Mapping(mapping))
}

fn toml_item_to_value(item: &toml_edit::Item) -> Result<Value, String> {
    match item {
        toml_edit::Item::Value(v) => Ok(toml_value_to_pbxproj(v)),
        toml_edit::Item::Table(t) => toml_table_to_value(t),
        toml_edit::Item::ArrayOfTables(arr) => {
            let items: Result<Vec<Value>, String> = arr.iter().map(toml_table_to_value).collect();
            Ok(Value::Array(items?))
        }
        toml_edit::Item::None => Err("Empty TOML item".to_string()),
    }
}

fn toml_value_to_pbxproj(v: &toml_edit::Value) -> Value {
    match v {
        toml_edit::Value::String(s) => Value::String(s.value().clone()),
        toml_edit::Value::Integer(i) => Value::String(i.value().to_string()),
        toml_edit::Value::Float(f) => Value::String(f.value().to_string()),
        toml_edit::Value::Boolean(b) => {
            Value::from(if *b.value() { "YES" } else { "NO" })
        }
        toml_edit::Value::Datetime(dt) => Value::String(dt.value().to_string()),
        toml_edit::Value::Array(arr) => {
            Value::Array(arr.iter().map(toml_value_to_pbxproj).collect())
        }
        toml_edit::Value::InlineTable(table) => Value::Mapping(
            table
                .iter()
                .map(|(key, val)| (key, toml_value_to_pbxproj(val)))
                .collect(),
        ),
    }
}

fn value_to_toml(value: &Value) -> toml_edit::Item {
    match value {
        Value::Mapping(map) => {
            let mut table = toml_edit::Table::new();
            for (k, v) in map.iter() {
                table.insert(k, value_to_toml(v));
            }
            toml_edit::Item::Table(table)
        }
        _ => toml_edit::Item::Value(value_to_inline_toml(value)),
    }
}

/// Convert a value for a position where only inline TOML is allowed.
fn value_to_inline_toml(value: &Value) -> toml_edit::Value {
    match value {
        Value::String(s) => toml_edit::Value::String(toml_edit::Formatted::new(s.clone())),
        Value::Array(arr) => {
            let mut toml_arr = toml_edit::Array::new();
            for v in arr {
                toml_arr.push(value_to_inline_toml(v));
            }
            toml_edit::Value::Array(toml_arr)
        }
        Value::Mapping(map) => {
            let mut inline = toml_edit::InlineTable::new();
            for (k, v) in map.iter() {
                inline.insert(k, value_to_inline_toml(v));
            }
            toml_edit::Value::InlineTable(inline)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        let value = decode("version = 56\nenabled = false\n[settings]\nname = \"App\"\n").unwrap();
        assert_eq!(value.get("version"), Some(&Value::from("56")));
        assert_eq!(value.get("enabled"), Some(&Value::from("NO")));
        assert_eq!(
            value.get("settings").and_then(|s| s.get("name")),
            Some(&Value::from("App"))
        );
    }

    #[test]
    fn test_array_root_is_rejected() {
        assert!(encode(&Value::Array(vec![])).is_err());
    }

    #[test]
    fn test_round_trip() {
        let value = Value::Mapping(
            [
                ("archiveVersion", Value::from("1")),
                (
                    "objects",
                    Value::Mapping(
                        [(
                            "AAAA",
                            Value::Mapping(
                                [
                                    ("isa", Value::from("PBXGroup")),
                                    (
                                        "children",
                                        Value::Array(vec![
                                            "BBBB".into(),
                                            Value::Mapping(
                                                [("k", Value::from("v"))].into_iter().collect(),
                                            ),
                                        ]),
                                    ),
                                ]
                                .into_iter()
                                .collect(),
                            ),
                        )]
                        .into_iter()
                        .collect(),
                    ),
                ),
            ]
            .into_iter()
            .collect(),
        );
        let toml = encode(&value).unwrap();
        assert_eq!(decode(&toml).unwrap(), value);
    }
}
