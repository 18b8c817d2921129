//! Read-only dotted-path lookups over a TOML manifest
//!
//! A `LayeredConfig` is a view over one branch of the manifest. Sections are
//! views too: taking a section never mutates the backing document.

use crate::error::{Error, Result};
use toml::{Table, Value};

/// Hierarchical key lookup over an (optional) TOML document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayeredConfig {
    data: Option<Value>,
}

impl LayeredConfig {
    pub fn new(data: Value) -> Self {
        Self { data: Some(data) }
    }

    /// A config with no backing document. Every lookup fails with
    /// [`Error::ManifestUnavailable`].
    pub fn absent() -> Self {
        Self { data: None }
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Get the value at `path` (dot-separated).
    ///
    /// Returns `Ok(None)` when any segment is missing or descends into a
    /// non-table value.
    pub fn get(&self, path: &str) -> Result<Option<&Value>> {
        let mut current = self.data.as_ref().ok_or(Error::ManifestUnavailable)?;
        for part in path.split('.') {
            match current {
                Value::Table(table) => match table.get(part) {
                    Some(value) => current = value,
                    None => return Ok(None),
                },
                _ => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Scope a new config to the value at `path`, or an empty table if absent
    pub fn section(&self, path: &str) -> Result<LayeredConfig> {
        let value = self
            .get(path)?
            .cloned()
            .unwrap_or_else(|| Value::Table(Table::new()));
        Ok(LayeredConfig::new(value))
    }

    pub fn is_table(&self) -> bool {
        matches!(self.data, Some(Value::Table(_)))
    }

    pub fn get_bool(&self, path: &str, default: bool) -> Result<bool> {
        match self.get(path)? {
            Some(value) => expect_bool(path, value),
            None => Ok(default),
        }
    }

    pub fn get_str(&self, path: &str) -> Result<Option<String>> {
        self.get(path)?
            .map(|value| expect_string(path, value))
            .transpose()
    }
}

/// Human readable name of a TOML value's type, for error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Integer(_) => "integer",
        Value::Float(_) => "float",
        Value::Boolean(_) => "boolean",
        Value::Datetime(_) => "datetime",
        Value::Array(_) => "array",
        Value::Table(_) => "table",
    }
}

fn mismatch(field: &str, expected: &str, value: &Value) -> Error {
    Error::ConfigError(format!(
        "Expected {expected} for field '{field}', found {}",
        type_name(value)
    ))
}

pub fn expect_bool(field: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| mismatch(field, "a boolean", value))
}

pub fn expect_string(field: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch(field, "a string", value))
}

pub fn expect_string_list(field: &str, value: &Value) -> Result<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| mismatch(field, "an array of strings", value))?;
    items.iter().map(|item| expect_string(field, item)).collect()
}

/// A single string is accepted as a one-element list
pub fn expect_string_or_list(field: &str, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(_) => expect_string_list(field, value),
        other => Err(mismatch(field, "a string or an array of strings", other)),
    }
}

pub fn expect_table<'a>(field: &str, value: &'a Value) -> Result<&'a Table> {
    value
        .as_table()
        .ok_or_else(|| mismatch(field, "a table", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LayeredConfig {
        let doc: Value = toml::from_str(
            r#"
            root_key = "test"
            [tool.poetry-pyinstaller-plugin]
            pre-build = "hooks.pyinstaller:pre_build"
            post-build = "hooks.pyinstaller:post_build"

            [tool.poetry-pyinstaller-plugin.targets.my-tool]
            source = "test_package/main.py"
            bundle = true
            "#,
        )
        .unwrap();
        LayeredConfig::new(doc)
    }

    #[test]
    fn test_lookup() {
        let config = config();
        assert_eq!(config.get_str("root_key").unwrap().as_deref(), Some("test"));
        assert_eq!(config.get("does_not_exist").unwrap(), None);
        assert_eq!(
            config
                .get_str("tool.poetry-pyinstaller-plugin.pre-build")
                .unwrap()
                .as_deref(),
            Some("hooks.pyinstaller:pre_build")
        );
    }

    #[test]
    fn test_lookup_through_scalar_is_missing() {
        let config = config();
        assert_eq!(config.get("root_key.nested").unwrap(), None);
    }

    #[test]
    fn test_absent_document_is_an_error() {
        let err = LayeredConfig::absent().get("does_not_exist").unwrap_err();
        assert!(matches!(err, Error::ManifestUnavailable));
        assert_eq!(err.to_string(), "Error while retrieving pyproject.toml data.");
    }

    #[test]
    fn test_section() {
        let config = config();
        let section = config
            .section("tool.poetry-pyinstaller-plugin.targets.my-tool")
            .unwrap();
        assert_eq!(
            section.get_str("source").unwrap().as_deref(),
            Some("test_package/main.py")
        );
        assert!(section.get_bool("bundle", false).unwrap());
    }

    #[test]
    fn test_missing_section_is_empty_table() {
        let section = config().section("tool.nothing.here").unwrap();
        assert!(section.is_table());
        assert!(!section.get_bool("bundle", false).unwrap());
    }

    #[test]
    fn test_section_does_not_mutate_document() {
        let config = config();
        let before = config.clone();
        let _ = config.section("tool.poetry-pyinstaller-plugin").unwrap();
        let _ = config.section("tool.missing").unwrap();
        assert_eq!(config, before);
    }

    #[test]
    fn test_type_mismatch() {
        let err = config().get_bool("root_key", false).unwrap_err();
        assert!(err.to_string().contains("Expected a boolean for field 'root_key'"));
    }

    #[test]
    fn test_string_or_list() {
        let single = Value::String("requests".into());
        let list = Value::Array(vec![Value::String("requests".into())]);
        assert_eq!(
            expect_string_or_list("hidden-import", &single).unwrap(),
            expect_string_or_list("hidden-import", &list).unwrap()
        );
    }
}
