//! YAML transcoding: convert between pbxproj values and YAML text.
//!
//! Mapping from YAML to pbxproj:
//!   - YAML string        -> Value::String
//!   - YAML number        -> Value::String (decimal text)
//!   - YAML bool          -> Value::String ("YES" / "NO")
//!   - YAML sequence      -> Value::Array
//!   - YAML mapping       -> Value::Mapping (scalar keys only)
//!   - YAML null          -> error (pbxproj has no null)
//!   - tagged values      -> the inner value, tag dropped
//!
//! Mapping from pbxproj to YAML:
//!   - Value::String      -> YAML string
//!   - Value::Array       -> YAML sequence
//!   - Value::Mapping     -> YAML mapping (entry order kept)
//!
//! JSON input is accepted through the same decoder, since JSON is a subset
//! of YAML.

use libpbxproj::{Mapping, Value};

/// Decode a YAML string into a pbxproj Value.
pub fn decode(input: &str) -> Result<Value, String> {
    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(input).map_err(|e| format!("YAML parse error: {}", e))?;
    yaml_to_value(&yaml_value)
}

/// Encode a pbxproj Value as a YAML string.
pub fn encode(value: &Value) -> Result<String, String> {
    serde_yaml::to_string(&value_to_yaml(value))
        .map_err(|e| format!("YAML encode error: {}", e))
}

fn yaml_scalar_text(yaml: &serde_yaml::Value) -> Option<String> {
    match yaml {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(true) => Some("YES".to_string()),
        serde_yaml::Value::Bool(false) => Some("NO".to_string()),
        _ => None,
    }
}

fn yaml_to_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Err("pbxproj has no null value".to_string()),
        serde_yaml::Value::Bool(_)
        | serde_yaml::Value::Number(_)
        | serde_yaml::Value::String(_) => Ok(Value::String(
            yaml_scalar_text(yaml).unwrap_or_default(),
        )),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut mapping = Mapping::new();
            for (k, v) in map {
                let key = yaml_scalar_text(k)
                    .ok_or_else(|| format!("Unsupported YAML mapping key type: {:?}", k))?;
                mapping.insert(key, yaml_to_value(v)?);
            }
            Ok(Value::Mapping(mapping))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(&tagged.value),
    }
}

fn value_to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Array(arr) => serde_yaml::Value::Sequence(arr.iter().map(value_to_yaml).collect()),
        Value::Mapping(map) => {
            let mut yaml_map = serde_yaml::Mapping::new();
            for (k, v) in map.iter() {
                yaml_map.insert(serde_yaml::Value::String(k.to_string()), value_to_yaml(v));
            }
            serde_yaml::Value::Mapping(yaml_map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_scalars_become_strings() {
        let value = decode("name: App\nversion: 56\nenabled: true\nlist: [a, 1]\n").unwrap();
        assert_eq!(value.get("name"), Some(&Value::from("App")));
        assert_eq!(value.get("version"), Some(&Value::from("56")));
        assert_eq!(value.get("enabled"), Some(&Value::from("YES")));
        assert_eq!(
            value.get("list"),
            Some(&Value::Array(vec!["a".into(), "1".into()]))
        );
    }

    #[test]
    fn test_decode_json() {
        let value = decode(r#"{"b": ["x"], "a": {}}"#).unwrap();
        let keys: Vec<&str> = value.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_decode_null_is_rejected() {
        assert!(decode("key: ~\n").is_err());
    }

    #[test]
    fn test_round_trip_keeps_strings() {
        let value = Value::Mapping(
            [
                ("objectVersion", Value::from("56")),
                ("name", "My App".into()),
                ("files", Value::Array(vec!["a.swift".into()])),
            ]
            .into_iter()
            .collect(),
        );
        let yaml = encode(&value).unwrap();
        assert_eq!(decode(&yaml).unwrap(), value);
    }
}
