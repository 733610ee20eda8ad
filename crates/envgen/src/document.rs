//! spec document layer
//!
//! [ConfigDocument] owns the classified form of one XML spec document:
//! - the declared environment names, in document order
//! - the optional `current` environment marker
//! - top-level sections, each holding `config` blocks per environment, each
//!   block an ordered list of [Declaration]s
//!
//! Classification happens here, at the boundary; no XML node escapes this
//! module. The document is read-only input - nothing in the crate mutates it
//! after parsing.
use crate::declaration::Declaration;
use indexmap::IndexMap;
use std::path::Path;

const ENVIRONMENTS_TAG: &str = "environments";
const ENVIRONMENT_TAG: &str = "environment";
const BLOCK_TAG: &str = "config";

#[derive(Default, Debug)]
pub struct ConfigDocument {
    environments: Vec<String>,
    current: Option<String>,
    sections: IndexMap<String, Section>,
}

impl ConfigDocument {
    /// Parse and classify one spec document
    ///
    /// Only well-formedness is validated; the root element name is not
    /// checked and unexpected elements are simply not looked at.
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let xml = roxmltree::Document::parse(text)?;

        let mut document = Self::default();
        for element in xml.root_element().children().filter(|n| n.is_element()) {
            if element.has_tag_name(ENVIRONMENTS_TAG) {
                document.read_environments(element);
                continue;
            }

            document.read_section(element);
        }

        tracing::debug!(
            environments = document.environments.len(),
            sections = document.sections.len(),
            "spec document classified"
        );
        Ok(document)
    }

    pub fn load_file(path: &Path) -> Result<Self, LoadError> {
        tracing::info!(path=%path.display(), "loading spec document");
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    fn read_environments(&mut self, element: roxmltree::Node<'_, '_>) {
        if let Some(current) = element.attribute("current") {
            self.current = Some(current.to_string());
        }

        for environment in element
            .children()
            .filter(|n| n.is_element() && n.has_tag_name(ENVIRONMENT_TAG))
        {
            if let Some(name) = environment.attribute("name") {
                self.environments.push(name.to_string());
            }
        }
    }

    fn read_section(&mut self, element: roxmltree::Node<'_, '_>) {
        let section = self
            .sections
            .entry(element.tag_name().name().to_string())
            .or_default();

        for block in element
            .children()
            .filter(|n| n.is_element() && n.has_tag_name(BLOCK_TAG))
        {
            let Some(env) = block.attribute("env") else {
                // a block without an env attribute can never be looked up
                tracing::debug!("skipping config block without env attribute");
                continue;
            };

            section.blocks.push(EnvBlock {
                env: env.to_string(),
                declarations: block
                    .children()
                    .filter(|n| n.is_element())
                    .map(Declaration::classify)
                    .collect(),
            });
        }
    }

    /// Declared environment names, in document order
    pub fn environments(&self) -> impl Iterator<Item = &str> {
        self.environments.iter().map(String::as_str)
    }

    /// Case-sensitive membership test against the declared environment list
    pub fn is_environment_supported(&self, env: &str) -> bool {
        self.environments.iter().any(|name| name == env)
    }

    /// Environment marked as currently active, when the document declares one
    pub fn current_environment(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }
}

/// Top-level grouping of per-environment generation blocks
#[derive(Default, Debug)]
pub struct Section {
    blocks: Vec<EnvBlock>,
}

impl Section {
    /// First block declared for `env`, in document order
    ///
    /// Duplicate blocks for the same environment are permitted; lookup is
    /// deterministic by taking the first.
    pub fn block_for(&self, env: &str) -> Option<&EnvBlock> {
        self.blocks.iter().find(|block| block.env == env)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &EnvBlock> {
        self.blocks.iter()
    }
}

/// One environment's ordered declarations within a section
#[derive(Debug)]
pub struct EnvBlock {
    env: String,
    declarations: Vec<Declaration>,
}

impl EnvBlock {
    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Unable to parse xml document")]
    XmlParseFailed(#[from] roxmltree::Error),
}

/// Utility macro to create a [ConfigDocument]
///
/// ```
/// # use envgen::config_document;
/// config_document! {r#"
/// <envgen>
///   <environments>
///     <environment name="prod"/>
///   </environments>
/// </envgen>
/// "#};
/// ```
///
/// # Panic
/// Panics on invalid input
///
/// ```should_panic
/// # use envgen::config_document;
/// config_document!("<unclosed");
/// ```
#[macro_export]
macro_rules! config_document {
    { $expr:expr } => {
        $crate::document::ConfigDocument::parse($expr).expect("document must parse")
    };
}
