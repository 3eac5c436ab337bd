//! Conversions between pbxproj values and other text formats.

pub mod toml;
pub mod yaml;
