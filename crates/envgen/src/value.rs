//! output value model
//!
//! The generated configuration is described by two small types:
//! - [ConstantValue]: the value of one generated constant, either kept as
//!   the source string or cast to a boolean
//! - [Parameter]: the flat name/value record used for listing and diffing
//!
//! Values serialize via [serde] for the CLI's yaml/json output.
use serde::ser::SerializeStruct;
use serde::Serializer;

/// Display name assigned to parameters that are not plain constants
pub const CUSTOM_CODE_NAME: &str = "Custom Code";

/// The value of one generated constant
///
/// Reading a declaration always starts from the attribute's raw string; the
/// boolean form only exists when the declaration carries `isBoolean="true"`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Str(String),
    Bool(bool),
}

impl ConstantValue {
    /// Boolean reading of raw attribute text
    ///
    /// Empty text and the literal `"false"` are false, anything else is true.
    pub fn cast_bool(raw: &str) -> Self {
        ConstantValue::Bool(!raw.is_empty() && raw != "false")
    }
}

impl From<&str> for ConstantValue {
    fn from(value: &str) -> Self {
        ConstantValue::Str(value.to_string())
    }
}

impl From<String> for ConstantValue {
    fn from(value: String) -> Self {
        ConstantValue::Str(value)
    }
}

impl From<bool> for ConstantValue {
    fn from(value: bool) -> Self {
        ConstantValue::Bool(value)
    }
}

impl serde::ser::Serialize for ConstantValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ConstantValue::Str(value) => serializer.serialize_str(value),
            ConstantValue::Bool(value) => serializer.serialize_bool(*value),
        }
    }
}

/// One declaration's resulting configuration entry
///
/// The value is always the source text, even for boolean-flagged constants -
/// listings show what the document says, not what gets emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl serde::ser::Serialize for Parameter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ser = serializer.serialize_struct("Parameter", 2)?;
        ser.serialize_field("name", &self.name)?;
        ser.serialize_field("value", &self.value)?;
        ser.end()
    }
}

/// Side-by-side parameter snapshot of two environments
///
/// The lists are paired by declaration order. Index `i` in `current` only
/// corresponds to index `i` in `target` when the declaration order is
/// identical across both environments.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamsDiff {
    pub current: Vec<Parameter>,
    pub target: Vec<Parameter>,
}

impl serde::ser::Serialize for ParamsDiff {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ser = serializer.serialize_struct("ParamsDiff", 2)?;
        ser.serialize_field("current", &self.current)?;
        ser.serialize_field("new", &self.target)?;
        ser.end()
    }
}
