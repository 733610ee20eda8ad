//! code emitter capability and the PHP artifact emitter
//!
//! The updater only ever talks to the [CodeEmitter] trait; the concrete
//! syntax of the generated artifact lives entirely behind it. Implementations
//! buffer in memory and persist in [CodeEmitter::finalize] - the guard "an
//! absent section performs no work" relies on nothing touching the target
//! file earlier.
use crate::value::ConstantValue;
use std::path::PathBuf;

/// Sink for generated statements
pub trait CodeEmitter {
    fn append_comment(&mut self, text: &str);
    fn append_empty_line(&mut self);
    fn append_constant_definition(&mut self, name: &str, value: &ConstantValue);
    fn append_raw_statement(&mut self, code: &str);
    /// Persist the buffered artifact
    fn finalize(&mut self) -> std::io::Result<()>;
}

/// Emits an executable PHP configuration file
///
/// Constants become `define('NAME', <literal>);` statements, custom code is
/// written verbatim. The whole artifact is written in one shot on finalize.
#[derive(Debug)]
pub struct PhpEmitter {
    target: PathBuf,
    body: String,
}

impl PhpEmitter {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            body: String::new(),
        }
    }

    /// Full artifact text as finalize would write it
    pub fn render(&self) -> String {
        format!("<?php\n{}?>\n", self.body)
    }

    fn string_literal(value: &str) -> String {
        let mut literal = String::with_capacity(value.len() + 2);
        literal.push('\'');
        for c in value.chars() {
            if c == '\'' || c == '\\' {
                literal.push('\\');
            }
            literal.push(c);
        }
        literal.push('\'');
        literal
    }
}

impl CodeEmitter for PhpEmitter {
    fn append_comment(&mut self, text: &str) {
        self.body.push_str("// ");
        self.body.push_str(text);
        self.body.push('\n');
    }

    fn append_empty_line(&mut self) {
        self.body.push('\n');
    }

    fn append_constant_definition(&mut self, name: &str, value: &ConstantValue) {
        let literal = match value {
            ConstantValue::Str(value) => Self::string_literal(value),
            ConstantValue::Bool(true) => "true".to_string(),
            ConstantValue::Bool(false) => "false".to_string(),
        };

        self.body.push_str("define(");
        self.body.push_str(&Self::string_literal(name));
        self.body.push_str(", ");
        self.body.push_str(&literal);
        self.body.push_str(");\n");
    }

    fn append_raw_statement(&mut self, code: &str) {
        self.body.push_str(code);
        self.body.push('\n');
    }

    fn finalize(&mut self) -> std::io::Result<()> {
        tracing::info!(target=%self.target.display(), "writing generated artifact");
        std::fs::write(&self.target, self.render())
    }
}
