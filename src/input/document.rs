//! Setup document loading
//!
//! A setup document is either a single flat bundle of fields, or a bundle of
//! shared fields plus a `loaders` list whose entries override the shared
//! fields one loader at a time.

use super::bundle::{RawBundle, ScalarValue};
use super::keys;
use crate::error::{ErrorCode, SetupError};
use serde_json::Value;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Default document path when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

/// Parsed setup document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetupDocument {
    /// Top-level fields, shared by every loader
    pub base: RawBundle,
    /// Per-loader overrides; `None` means the document is a single loader
    pub loaders: Option<Vec<RawBundle>>,
}

impl SetupDocument {
    /// Build a document from an already-parsed value
    pub fn from_value(value: Value) -> Result<Self, SetupError> {
        let Value::Object(map) = value else {
            return Err(SetupError::input_with_code(
                ErrorCode::INPUT_NOT_AN_OBJECT,
                "the top level of the document must be an object",
                None,
            ));
        };

        let mut base = RawBundle::new();
        let mut loaders = None;

        for (key, value) in map {
            if key == keys::LOADERS {
                loaders = parse_loaders(&value)?;
                continue;
            }
            base.insert(key.clone(), scalar_field(&key, &value)?);
        }

        Ok(Self { base, loaders })
    }

    /// Parse JSON text
    pub fn from_json_str(content: &str) -> Result<Self, SetupError> {
        let value: Value = serde_json::from_str(content).map_err(|e| {
            SetupError::input_with_code(ErrorCode::INPUT_INVALID_JSON, "invalid JSON syntax", None)
                .with_source(e)
        })?;
        Self::from_value(value)
    }

    /// Parse YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, SetupError> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| {
            SetupError::input_with_code(ErrorCode::INPUT_INVALID_YAML, "invalid YAML syntax", None)
                .with_source(e)
        })?;
        Self::from_value(value)
    }

    /// The bundles to run, one per loader, with shared fields merged in
    pub fn loader_bundles(&self) -> Vec<RawBundle> {
        match &self.loaders {
            Some(loaders) => loaders
                .iter()
                .map(|loader| self.base.merged_with(loader))
                .collect(),
            None => vec![self.base.clone()],
        }
    }
}

/// Read a setup document from disk; `.yaml`/`.yml` files are YAML, all
/// others JSON
pub async fn load_document(path: &Path) -> Result<SetupDocument, SetupError> {
    debug!("Loading setup document from {}", path.display());

    let content = fs::read_to_string(path).await.map_err(|e| {
        let code = if e.kind() == std::io::ErrorKind::NotFound {
            ErrorCode::INPUT_NOT_FOUND
        } else {
            ErrorCode::INPUT_GENERIC
        };
        SetupError::input_with_code(code, "cannot read file", Some(path.to_path_buf()))
            .with_source(e)
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
        SetupDocument::from_yaml_str(&content)
    } else {
        SetupDocument::from_json_str(&content)
    };

    parsed.map_err(|err| match err {
        SetupError::Input {
            code,
            message,
            path: None,
            source,
        } => SetupError::Input {
            code,
            message,
            path: Some(path.to_path_buf()),
            source,
        },
        other => other,
    })
}

fn scalar_field(key: &str, value: &Value) -> Result<ScalarValue, SetupError> {
    ScalarValue::from_json(value).ok_or_else(|| {
        SetupError::input_with_code(
            ErrorCode::INPUT_NOT_SCALAR,
            format!("field '{}' must be a string, number or boolean", key),
            None,
        )
    })
}

fn parse_loaders(value: &Value) -> Result<Option<Vec<RawBundle>>, SetupError> {
    let items = match value {
        Value::Null => return Ok(None),
        Value::Array(items) => items,
        _ => {
            return Err(SetupError::input_with_code(
                ErrorCode::INPUT_INVALID_LOADERS,
                "'loaders' must be a list of objects",
                None,
            ))
        }
    };

    let mut loaders = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Value::Object(fields) = item else {
            return Err(SetupError::input_with_code(
                ErrorCode::INPUT_INVALID_LOADERS,
                format!("loader {} must be an object", index + 1),
                None,
            ));
        };

        let mut bundle = RawBundle::new();
        for (key, value) in fields {
            bundle.insert(key.clone(), scalar_field(key, value)?);
        }
        loaders.push(bundle);
    }

    Ok(Some(loaders))
}
