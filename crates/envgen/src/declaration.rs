//! declaration classification and interpretation
//!
//! Tag dispatch happens once, at the document boundary
//! ([Declaration::classify]); everything downstream works with the closed
//! [DeclarationKind] set. Two readings exist for a declaration:
//! - [Declaration::interpret]: the strict reading used for generation, which
//!   rejects unknown tags
//! - [Declaration::parameter]: the total projection used for listing and
//!   diffing, which never fails
use crate::value::{ConstantValue, Parameter, CUSTOM_CODE_NAME};

pub(crate) const TAG_CONSTANT: &str = "constant";
pub(crate) const TAG_CUSTOM_CODE: &str = "customCode";

/// One ordered entry of an environment block
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    comment: Option<String>,
    kind: DeclarationKind,
}

/// Closed set of declaration tags
///
/// Unknown tags keep their name and raw text instead of being dropped: the
/// parameter projection must produce a record for them.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    Constant {
        name: String,
        value: String,
        is_boolean: bool,
    },
    CustomCode {
        code: String,
    },
    Unknown {
        tag: String,
        text: String,
    },
}

impl Declaration {
    /// Classify one XML element into the closed declaration set
    ///
    /// Absent `name`/`value` attributes read as empty strings; attribute
    /// presence is not validated here.
    pub(crate) fn classify(node: roxmltree::Node<'_, '_>) -> Self {
        let comment = node.attribute("comment").map(str::to_string);

        let kind = match node.tag_name().name() {
            TAG_CONSTANT => DeclarationKind::Constant {
                name: node.attribute("name").unwrap_or_default().to_string(),
                value: node.attribute("value").unwrap_or_default().to_string(),
                is_boolean: node.attribute("isBoolean") == Some("true"),
            },
            TAG_CUSTOM_CODE => DeclarationKind::CustomCode {
                code: node.text().unwrap_or_default().to_string(),
            },
            other => {
                tracing::trace!(tag = other, "unknown declaration tag");
                DeclarationKind::Unknown {
                    tag: other.to_string(),
                    text: node.text().unwrap_or_default().to_string(),
                }
            }
        };

        Self { comment, kind }
    }

    /// Strict interpretation used by the generation path
    pub fn interpret(&self) -> Result<Statement, UnsupportedTag> {
        let body = match &self.kind {
            DeclarationKind::Constant {
                name,
                value,
                is_boolean,
            } => {
                // the raw string is the baseline; the boolean reading
                // replaces it only when the cast was asked for
                let raw = value.as_str();
                let value = if *is_boolean {
                    ConstantValue::cast_bool(raw)
                } else {
                    ConstantValue::from(raw)
                };

                StatementBody::Constant {
                    name: name.clone(),
                    value,
                }
            }
            DeclarationKind::CustomCode { code } => StatementBody::Raw(code.trim().to_string()),
            DeclarationKind::Unknown { tag, .. } => return Err(UnsupportedTag(tag.clone())),
        };

        Ok(Statement {
            comment: self.comment.clone(),
            body,
        })
    }

    /// Total projection used by the parameter listing and diff path
    ///
    /// Tags the interpreter rejects degrade to the custom-code display
    /// convention, so every declaration yields exactly one record.
    pub fn parameter(&self) -> Parameter {
        match &self.kind {
            DeclarationKind::Constant { name, value, .. } => Parameter::new(name, value),
            DeclarationKind::CustomCode { code } => Parameter::new(CUSTOM_CODE_NAME, code.trim()),
            DeclarationKind::Unknown { text, .. } => Parameter::new(CUSTOM_CODE_NAME, text.trim()),
        }
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn kind(&self) -> &DeclarationKind {
        &self.kind
    }
}

/// Interpreted form of one declaration, ready for emission
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub comment: Option<String>,
    pub body: StatementBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementBody {
    Constant { name: String, value: ConstantValue },
    Raw(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("XML tag \"{0}\" is not supported by the config updater")]
pub struct UnsupportedTag(pub String);
