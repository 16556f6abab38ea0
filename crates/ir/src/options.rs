//! Generator options handed over by the schema toolchain
//!
//! Alongside the data model, the toolchain passes the path of the schema
//! file, the block configuring this generator (output location and free-form
//! config values) and the other generators declared in the same schema. The
//! latter are needed to locate the generated database client.

use crate::datamodel::Datamodel;
use nestbase_core::{EngineError, EngineResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Provider name of the generator producing the database client
pub const CLIENT_PROVIDER: &str = "prisma-client-js";

// ============================================================================
// EnvValue
// ============================================================================

/// A configuration value that is either literal or read from an environment
/// variable (`output = env("BASE_OUTPUT")`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvValue {
    pub value: Option<String>,
    pub from_env_var: Option<String>,
}

impl EnvValue {
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            from_env_var: None,
        }
    }

    /// Resolve the value against the process environment
    pub fn resolve(&self, what: &str) -> EngineResult<String> {
        self.resolve_with(what, |var| std::env::var(var).ok())
    }

    /// Resolve the value with a custom environment lookup
    pub fn resolve_with<F>(&self, what: &str, lookup: F) -> EngineResult<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(var) = &self.from_env_var {
            return lookup(var).ok_or_else(|| {
                EngineError::missing_config(format!(
                    "{} (environment variable '{}' is not set)",
                    what, var
                ))
            });
        }

        self.value
            .clone()
            .ok_or_else(|| EngineError::missing_config(what.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEnvValue {
    Plain(String),
    Object {
        #[serde(default)]
        value: Option<String>,
        #[serde(default, rename = "fromEnvVar")]
        from_env_var: Option<String>,
    },
}

impl<'de> Deserialize<'de> for EnvValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match RawEnvValue::deserialize(deserializer)? {
            RawEnvValue::Plain(value) => EnvValue::literal(value),
            RawEnvValue::Object {
                value,
                from_env_var,
            } => EnvValue {
                value,
                from_env_var,
            },
        })
    }
}

// ============================================================================
// GeneratorInfo
// ============================================================================

/// One `generator` block of the schema
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorInfo {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub provider: Option<EnvValue>,

    #[serde(default)]
    pub output: Option<EnvValue>,

    /// Free-form key/value configuration of the block
    #[serde(default)]
    pub config: BTreeMap<String, serde_json::Value>,
}

impl GeneratorInfo {
    /// Whether this block configures the database client generator
    pub fn is_client_generator(&self) -> bool {
        self.provider
            .as_ref()
            .and_then(|p| p.value.as_deref())
            .is_some_and(|p| p == CLIENT_PROVIDER)
    }
}

// ============================================================================
// GeneratorOptions
// ============================================================================

/// Wrapper for the data model as delivered inside the options document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Dmmf {
    pub datamodel: Datamodel,
}

/// Everything the toolchain hands to a generator run
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
    /// Path of the schema file the data model was read from
    #[serde(default)]
    pub schema_path: Option<PathBuf>,

    /// This generator's block
    #[serde(default)]
    pub generator: GeneratorInfo,

    /// The other generator blocks of the schema
    #[serde(default)]
    pub other_generators: Vec<GeneratorInfo>,

    pub dmmf: Dmmf,
}

impl GeneratorOptions {
    /// Options carrying only a data model
    pub fn from_datamodel(datamodel: Datamodel) -> Self {
        Self {
            dmmf: Dmmf { datamodel },
            ..Self::default()
        }
    }

    pub fn datamodel(&self) -> &Datamodel {
        &self.dmmf.datamodel
    }

    /// The database client generator block, if declared
    pub fn client_generator(&self) -> Option<&GeneratorInfo> {
        self.other_generators
            .iter()
            .find(|g| g.is_client_generator())
    }
}
