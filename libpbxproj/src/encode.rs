//! Encode pbxproj values to text.
//!
//! The native encoder writes the old-style plist syntax back out, one entry
//! per line, indented with a tab per nesting level. Strings are left bare
//! when the tokenizer would read them back as a single identifier and quoted
//! otherwise. A JSON encoder is provided for interchange.

use crate::token::HEADER;
use crate::tokenizer::is_identifier_char;
use crate::Value;

/// Output format for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Old-style plist, the `.pbxproj` syntax (no header line)
    Pbxproj,
    /// JSON (standard)
    Json,
}

/// Encode a value to a string in the specified format.
pub fn encode(value: &Value, format: Format) -> String {
    match format {
        Format::Pbxproj => PBXPROJ.encode(value, 0),
        Format::Json => JSON.encode(value, 0),
    }
}

/// Encode a value as a complete `.pbxproj` file: header, root value, newline.
pub fn encode_document(value: &Value) -> String {
    format!("{}\n{}\n", HEADER, PBXPROJ.encode(value, 0))
}

// =============================================================================
// Layout
// =============================================================================

/// How one output format lays out containers and quotes strings.
struct Style {
    /// One level of indentation.
    unit: &'static str,
    /// Delimiters of an array.
    array: (char, char),
    /// Between a mapping key and its value.
    key_separator: &'static str,
    /// Written after an array element.
    element_end: &'static str,
    /// Written after a mapping entry.
    entry_end: &'static str,
    /// Whether the last item also gets its terminator.
    terminate_last: bool,
    /// Whether identifier-like strings may be written without quotes.
    bare_strings: bool,
    /// Prefix of a four-digit hex escape for other control characters.
    unicode_escape: &'static str,
}

const PBXPROJ: Style = Style {
    unit: "\t",
    array: ('(', ')'),
    key_separator: " = ",
    element_end: ",",
    entry_end: ";",
    terminate_last: true,
    bare_strings: true,
    unicode_escape: "\\U",
};

const JSON: Style = Style {
    unit: "  ",
    array: ('[', ']'),
    key_separator: ": ",
    element_end: ",",
    entry_end: ",",
    terminate_last: false,
    bare_strings: false,
    unicode_escape: "\\u",
};

impl Style {
    /// One item per line between the delimiters, or just the delimiters when empty.
    fn block(
        &self,
        (open, close): (char, char),
        items: Vec<String>,
        end: &str,
        indent: usize,
    ) -> String {
        let mut out = String::new();
        out.push(open);
        if items.is_empty() {
            out.push(close);
            return out;
        }
        out.push('\n');
        let last = items.len() - 1;
        for (i, item) in items.iter().enumerate() {
            out.push_str(&self.unit.repeat(indent + 1));
            out.push_str(item);
            if i < last || self.terminate_last {
                out.push_str(end);
            }
            out.push('\n');
        }
        out.push_str(&self.unit.repeat(indent));
        out.push(close);
        out
    }

    fn encode(&self, value: &Value, indent: usize) -> String {
        match value {
            Value::String(s) => self.encode_string(s),
            Value::Array(arr) => {
                let items = arr.iter().map(|v| self.encode(v, indent + 1)).collect();
                self.block(self.array, items, self.element_end, indent)
            }
            Value::Mapping(map) => {
                let items = map
                    .iter()
                    .map(|(k, v)| {
                        let key = self.encode_string(k);
                        format!("{}{}{}", key, self.key_separator, self.encode(v, indent + 1))
                    })
                    .collect();
                self.block(('{', '}'), items, self.entry_end, indent)
            }
        }
    }

    fn encode_string(&self, s: &str) -> String {
        if self.bare_strings && is_bare_identifier(s) {
            return s.to_string();
        }
        let mut result = String::from("\"");
        for c in s.chars() {
            match c {
                '"' => result.push_str("\\\""),
                '\\' => result.push_str("\\\\"),
                '\n' => result.push_str("\\n"),
                '\r' => result.push_str("\\r"),
                '\t' => result.push_str("\\t"),
                '\x08' => result.push_str("\\b"),
                '\x0c' => result.push_str("\\f"),
                c if c.is_control() => {
                    result.push_str(&format!("{}{:04x}", self.unicode_escape, c as u32));
                }
                c => result.push(c),
            }
        }
        result.push('"');
        result
    }
}

/// Whether `s` reads back as one bare identifier.
fn is_bare_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_identifier_char) && !s.contains("/*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, Mapping};

    fn mapping(entries: &[(&str, Value)]) -> Value {
        Value::Mapping(entries.iter().cloned().collect())
    }

    fn round_trip(value: &Value) -> Value {
        parse(&encode_document(value)).unwrap()
    }

    #[test]
    fn test_encode_empty_containers() {
        assert_eq!(encode(&Value::Array(vec![]), Format::Pbxproj), "()");
        assert_eq!(encode(&Value::Mapping(Mapping::new()), Format::Pbxproj), "{}");
    }

    #[test]
    fn test_encode_strings() {
        assert_eq!(encode(&"Foo.swift".into(), Format::Pbxproj), "Foo.swift");
        assert_eq!(encode(&"$(SRCROOT)/a".into(), Format::Pbxproj), "\"$(SRCROOT)/a\"");
        assert_eq!(encode(&"".into(), Format::Pbxproj), "\"\"");
        assert_eq!(encode(&"a b".into(), Format::Pbxproj), "\"a b\"");
        assert_eq!(encode(&"say \"hi\"\n".into(), Format::Pbxproj), r#""say \"hi\"\n""#);
        assert_eq!(encode(&"a/*b".into(), Format::Pbxproj), "\"a/*b\"");
        assert_eq!(encode(&"bell\x07".into(), Format::Pbxproj), r#""bell\U0007""#);
    }

    #[test]
    fn test_encode_nested_indentation() {
        let value = mapping(&[
            ("isa", "PBXGroup".into()),
            (
                "children",
                Value::Array(vec!["A.swift".into(), "B.swift".into()]),
            ),
            ("settings", mapping(&[("ENABLE", "YES".into())])),
        ]);
        assert_eq!(
            encode(&value, Format::Pbxproj),
            "{\n\
             \tisa = PBXGroup;\n\
             \tchildren = (\n\
             \t\tA.swift,\n\
             \t\tB.swift,\n\
             \t);\n\
             \tsettings = {\n\
             \t\tENABLE = YES;\n\
             \t};\n\
             }"
        );
    }

    #[test]
    fn test_encode_document() {
        let value = Value::Array(vec!["x".into()]);
        assert_eq!(encode_document(&value), "// !$*UTF8*$!\n(\n\tx,\n)\n");
    }

    #[test]
    fn test_round_trip() {
        let value = mapping(&[
            ("archiveVersion", "1".into()),
            ("classes", mapping(&[])),
            (
                "objects",
                mapping(&[(
                    "13B07F961A680F5B00A75B9A",
                    mapping(&[
                        ("isa", "PBXNativeTarget".into()),
                        ("buildPhases", Value::Array(vec![])),
                        ("name", "My App".into()),
                        ("shellScript", "echo \"done\"\nexit 0\n".into()),
                        ("path", "caf\u{e9}/\u{1F600}.png".into()),
                        ("key with spaces", "".into()),
                    ]),
                )]),
            ),
            (
                "nested",
                Value::Array(vec![Value::Array(vec!["a".into()]), mapping(&[])]),
            ),
        ]);
        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn test_round_trip_preserves_key_order() {
        let text = concat!(
            "// !$*UTF8*$!\n",
            "{\n\tzeta = 1;\n\talpha = 2;\n",
            "\tmid = (\n\t\tb,\n\t\ta,\n\t);\n}\n",
        );
        let value = parse(text).unwrap();
        assert_eq!(encode_document(&value), text);
    }

    #[test]
    fn test_control_character_escapes() {
        let value = Value::from("a\x08b\x0cc\x01");
        assert_eq!(encode(&value, Format::Pbxproj), r#""a\bb\fc\U0001""#);
        assert_eq!(encode(&value, Format::Json), r#""a\bb\fc\u0001""#);
        let array = Value::Array(vec![value]);
        assert_eq!(round_trip(&array), array);
    }

    #[test]
    fn test_encode_json() {
        let value = mapping(&[
            ("b", Value::Array(vec!["1".into(), "x\"y".into()])),
            ("a", mapping(&[])),
        ]);
        assert_eq!(
            encode(&value, Format::Json),
            "{\n  \"b\": [\n    \"1\",\n    \"x\\\"y\"\n  ],\n  \"a\": {}\n}"
        );
    }
}
