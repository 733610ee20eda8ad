//! # envgen - environment-scoped configuration file generation
//!
//! ## Introduction for developers
//!
//! Read this to understand how `envgen` works internally.
//!
//! ### Spec document terms
//!
//! Quick introduction to terms used to describe elements of a spec document.
//!
//! In an envgen XML spec...
//! - the `environments` element declares the supported deployment contexts,
//!   one `environment` child per name; its optional `current` attribute names
//!   the currently active one
//! - every other top-level element is a `section`: a grouping of generation
//!   blocks for one generated artifact kind (there is one section kind today,
//!   `ConfigPHPFile`)
//! - a section holds `config` blocks, each tagged with an `env` attribute
//! - a block holds ordered `declarations`, of which two kinds exist:
//!   - `constant`: a named value (`name`/`value` attributes, optional
//!     `isBoolean` cast flag)
//!   - `customCode`: verbatim generated-code text
//! - any declaration may carry a `comment` attribute that is attached in
//!   front of its generated statement
//!
//! This is a valid spec document:
//! ```xml
//! <envgen>
//!   <environments current="prod">
//!     <environment name="prod"/>
//!     <environment name="staging"/>
//!   </environments>
//!   <ConfigPHPFile>
//!     <config env="prod">
//!       <constant name="DEBUG" value="false" isBoolean="true" comment="debug switch"/>
//!       <customCode>date_default_timezone_set('UTC');</customCode>
//!     </config>
//!     <config env="staging">
//!       <constant name="DEBUG" value="true" isBoolean="true"/>
//!     </config>
//!   </ConfigPHPFile>
//! </envgen>
//! ```
//!
//! ### Loading and classification
//!
//! see [document::ConfigDocument::parse]
//!
//! The XML text is parsed with [roxmltree] and immediately classified into an
//! owned model at the document boundary: environment names in document order,
//! an order-preserving section table, and per-block declaration lists. Tag
//! dispatch happens exactly once, here - the rest of the crate only ever sees
//! the closed [declaration::DeclarationKind] set. Unknown tags are kept as a
//! distinct variant instead of being dropped, because the parameter listing
//! below must stay total.
//!
//! ### Generation
//!
//! see [updater::ConfigPhpUpdater]
//!
//! The updater resolves the block for the requested environment and drives an
//! injected [emitter::CodeEmitter]: a generation-header comment, then per
//! declaration its optional comment, its statement and a blank separator
//! line. Declarations are interpreted strictly
//! ([declaration::Declaration::interpret]) and a failing one is logged and
//! skipped - one malformed entry never aborts the artifact. The emitter
//! buffers everything and only touches the target file in
//! [emitter::CodeEmitter::finalize].
//!
//! ### Parameters and diff
//!
//! see [updater::params_by_env] and [updater::diff_params_by_env]
//!
//! The same block walk, minus the emitter, projects every declaration into a
//! [value::Parameter] record. This projection is total: tags the strict
//! interpreter rejects degrade to the `"Custom Code"` display convention so
//! the listing always has one record per declaration. A diff pairs the
//! current environment's list with a candidate environment's list
//! positionally; it is a side-by-side snapshot, not a structural delta.
//!
pub mod backup;
pub mod declaration;
pub mod document;
pub mod emitter;
pub mod updater;
pub mod value;
