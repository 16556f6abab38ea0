//! Enum descriptors

use nestbase_core::EngineError;
use serde::Deserialize;

/// An enum declared in the data model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawEnum")]
pub struct EnumDescriptor {
    /// Enum name as declared in the schema
    pub name: String,

    /// Value names, in declaration order
    pub values: Vec<String>,

    /// Database-level name, when mapped
    pub db_name: Option<String>,

    /// Documentation comment attached to the enum
    pub documentation: Option<String>,
}

impl EnumDescriptor {
    /// Create an enum from its name and ordered values
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            db_name: None,
            documentation: None,
        }
    }
}

// DMMF lists values as `{ "name": "ADMIN", "dbName": null }`; older
// documents use plain strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEnumValue {
    Named { name: String },
    Plain(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnum {
    name: String,
    #[serde(default)]
    values: Vec<RawEnumValue>,
    #[serde(default)]
    db_name: Option<String>,
    #[serde(default)]
    documentation: Option<String>,
}

impl TryFrom<RawEnum> for EnumDescriptor {
    type Error = EngineError;

    fn try_from(raw: RawEnum) -> Result<Self, Self::Error> {
        if raw.values.is_empty() {
            return Err(EngineError::invalid_schema(format!(
                "enum '{}' declares no values",
                raw.name
            )));
        }

        let values = raw
            .values
            .into_iter()
            .map(|v| match v {
                RawEnumValue::Named { name } | RawEnumValue::Plain(name) => name,
            })
            .collect();

        Ok(Self {
            name: raw.name,
            values,
            db_name: raw.db_name,
            documentation: raw.documentation,
        })
    }
}
