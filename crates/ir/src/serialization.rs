//! Loading schema documents
//!
//! The generator accepts two JSON shapes: the full options document a
//! toolchain hands to a generator (`{ "schemaPath", "generator", "dmmf", ... }`)
//! and a bare DMMF document (`{ "datamodel": { ... } }`).

use crate::datamodel::Datamodel;
use crate::options::GeneratorOptions;
use nestbase_core::{EngineError, EngineResult};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct BareDmmf {
    datamodel: Datamodel,
}

/// Load generator options from a file
///
/// # Example
///
/// ```rust,ignore
/// use nestbase_ir::load_options;
///
/// let options = load_options("dmmf.json")?;
/// println!("{} models", options.datamodel().models.len());
/// ```
pub fn load_options(path: impl AsRef<Path>) -> EngineResult<GeneratorOptions> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EngineError::SchemaNotFound(path.to_path_buf()));
    }

    let json = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    load_options_from_string(&json).map_err(|e| match e {
        EngineError::JsonSerialization(je) => EngineError::FileRead {
            path: path.to_path_buf(),
            message: format!("Invalid schema document: {}", je),
        },
        other => other,
    })
}

/// Load generator options from a JSON string
pub fn load_options_from_string(json: &str) -> EngineResult<GeneratorOptions> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    let Some(object) = value.as_object() else {
        return Err(EngineError::invalid_schema(
            "expected a JSON object at the document root",
        ));
    };

    if object.contains_key("dmmf") {
        Ok(serde_json::from_value(value)?)
    } else if object.contains_key("datamodel") {
        let bare: BareDmmf = serde_json::from_value(value)?;
        Ok(GeneratorOptions::from_datamodel(bare.datamodel))
    } else {
        Err(EngineError::invalid_schema(
            "document has neither a 'dmmf' nor a 'datamodel' key",
        ))
    }
}

/// Load only the data model from a file
pub fn load_datamodel(path: impl AsRef<Path>) -> EngineResult<Datamodel> {
    Ok(load_options(path)?.dmmf.datamodel)
}

// ============================================================================
// Tests
// ============================================================================
