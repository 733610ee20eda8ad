//! config.php updater
//!
//! The emission driver, parameter extractor and differ for the
//! `ConfigPHPFile` section. Structural problems (unknown environment,
//! missing block) abort the whole operation; a single declaration that fails
//! to interpret is logged and skipped so the rest of the artifact still gets
//! generated.
use crate::backup::BackupService;
use crate::declaration::StatementBody;
use crate::document::{ConfigDocument, EnvBlock};
use crate::emitter::CodeEmitter;
use crate::value::{Parameter, ParamsDiff};
use std::path::PathBuf;

/// Section this updater consumes
pub const CONFIG_PHP_SECTION: &str = "ConfigPHPFile";
/// Default name of the generated artifact
pub const CONFIG_PHP_FILE: &str = "config.php";

/// Shared surface of every file updater in the tool
pub trait FileUpdater {
    /// Generate the artifact for `env`, optionally backing up the previous one
    fn set_env(&mut self, env: &str, backup: bool) -> Result<(), UpdaterError>;

    /// Parameters the artifact would contain for `env`
    fn params_by_env(&self, env: &str) -> Result<Vec<Parameter>, UpdaterError>;

    /// Side-by-side parameters of the active environment and `env`
    fn diff_params_by_env(&self, env: &str) -> Result<ParamsDiff, UpdaterError>;
}

/// Resolve the environment block of a section
///
/// `Ok(None)` means the section is absent from the document, which callers
/// treat as "nothing to do". A section that exists without a block for `env`
/// is an error, as is an environment that was never declared.
fn resolve_block<'d>(
    doc: &'d ConfigDocument,
    section_name: &'static str,
    env: &str,
) -> Result<Option<&'d EnvBlock>, UpdaterError> {
    let Some(section) = doc.section(section_name) else {
        tracing::debug!(section = section_name, "section absent, nothing to do");
        return Ok(None);
    };

    if !doc.is_environment_supported(env) {
        return Err(UpdaterError::UnsupportedEnvironment(env.to_string()));
    }

    let Some(block) = section.block_for(env) else {
        return Err(UpdaterError::SectionNotConfigured {
            section: section_name,
            env: env.to_string(),
        });
    };

    Ok(Some(block))
}

/// Parameters the `ConfigPHPFile` artifact would contain for `env`
///
/// Total over the block: every declaration contributes exactly one record,
/// unknown tags included.
pub fn params_by_env(doc: &ConfigDocument, env: &str) -> Result<Vec<Parameter>, UpdaterError> {
    let Some(block) = resolve_block(doc, CONFIG_PHP_SECTION, env)? else {
        return Ok(Vec::new());
    };

    Ok(block
        .declarations()
        .map(|declaration| declaration.parameter())
        .collect())
}

/// Parameter lists of two environments, paired for change review
pub fn diff_params_by_env(
    doc: &ConfigDocument,
    current_env: &str,
    target_env: &str,
) -> Result<ParamsDiff, UpdaterError> {
    Ok(ParamsDiff {
        current: params_by_env(doc, current_env)?,
        target: params_by_env(doc, target_env)?,
    })
}

/// Updater for the executable `config.php` artifact
///
/// Holds the read-only spec document plus the injected collaborators: the
/// code emitter, the backup service, the caller-resolved current environment
/// and the generation timestamp (injected so runs are reproducible).
#[derive(derive_new::new)]
pub struct ConfigPhpUpdater<'d, E, B> {
    doc: &'d ConfigDocument,
    emitter: E,
    backup: B,
    artifact: PathBuf,
    current_env: Option<String>,
    generated_at: chrono::NaiveDateTime,
}

impl<E: CodeEmitter, B: BackupService> FileUpdater for ConfigPhpUpdater<'_, E, B> {
    // guards are spelled out instead of using resolve_block: the backup has
    // to run after the environment check but before the block lookup
    fn set_env(&mut self, env: &str, backup: bool) -> Result<(), UpdaterError> {
        let Some(section) = self.doc.section(CONFIG_PHP_SECTION) else {
            tracing::debug!(
                section = CONFIG_PHP_SECTION,
                "section absent, nothing to generate"
            );
            return Ok(());
        };

        if !self.doc.is_environment_supported(env) {
            return Err(UpdaterError::UnsupportedEnvironment(env.to_string()));
        }

        if backup {
            self.backup
                .backup(&self.artifact)
                .map_err(|source| UpdaterError::FileWrite {
                    artifact: self.artifact.clone(),
                    source,
                })?;
        }

        let Some(block) = section.block_for(env) else {
            return Err(UpdaterError::SectionNotConfigured {
                section: CONFIG_PHP_SECTION,
                env: env.to_string(),
            });
        };

        self.emitter.append_comment(&format!(
            "Generated by envgen. {}",
            self.generated_at.format("%Y-%m-%d %H:%M")
        ));
        self.emitter.append_empty_line();

        for declaration in block.declarations() {
            // one bad declaration must not abort the whole artifact
            let statement = match declaration.interpret() {
                Ok(statement) => statement,
                Err(err) => {
                    tracing::error!(%err, env, "skipping declaration");
                    continue;
                }
            };

            if let Some(comment) = &statement.comment {
                self.emitter.append_comment(comment);
            }
            match &statement.body {
                StatementBody::Constant { name, value } => {
                    self.emitter.append_constant_definition(name, value)
                }
                StatementBody::Raw(code) => self.emitter.append_raw_statement(code),
            }
            self.emitter.append_empty_line();
        }

        self.emitter
            .finalize()
            .map_err(|source| UpdaterError::FileWrite {
                artifact: self.artifact.clone(),
                source,
            })
    }

    fn params_by_env(&self, env: &str) -> Result<Vec<Parameter>, UpdaterError> {
        params_by_env(self.doc, env)
    }

    fn diff_params_by_env(&self, env: &str) -> Result<ParamsDiff, UpdaterError> {
        let current_env = self
            .current_env
            .as_deref()
            .ok_or(UpdaterError::CurrentEnvironmentUnknown)?;

        diff_params_by_env(self.doc, current_env, env)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum UpdaterError {
    #[error("environment \"{0}\" is not supported/declared in the spec document")]
    UnsupportedEnvironment(String),
    #[error("section \"{section}\" is not configured for environment \"{env}\"")]
    SectionNotConfigured {
        section: &'static str,
        env: String,
    },
    #[error("no current environment is known, cannot diff")]
    CurrentEnvironmentUnknown,
    #[error("write error on file {}", artifact.display())]
    FileWrite {
        artifact: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config_document;
    use crate::value::ConstantValue;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    enum Op {
        Comment(String),
        Empty,
        Constant(String, ConstantValue),
        Raw(String),
        Finalize,
    }

    #[derive(derive_new::new, Default)]
    struct RecordingEmitter {
        #[new(default)]
        ops: Vec<Op>,
    }

    impl CodeEmitter for RecordingEmitter {
        fn append_comment(&mut self, text: &str) {
            self.ops.push(Op::Comment(text.to_string()));
        }

        fn append_empty_line(&mut self) {
            self.ops.push(Op::Empty);
        }

        fn append_constant_definition(&mut self, name: &str, value: &ConstantValue) {
            self.ops.push(Op::Constant(name.to_string(), value.clone()));
        }

        fn append_raw_statement(&mut self, code: &str) {
            self.ops.push(Op::Raw(code.to_string()));
        }

        fn finalize(&mut self) -> std::io::Result<()> {
            self.ops.push(Op::Finalize);
            Ok(())
        }
    }

    struct FailingEmitter;

    impl CodeEmitter for FailingEmitter {
        fn append_comment(&mut self, _: &str) {}
        fn append_empty_line(&mut self) {}
        fn append_constant_definition(&mut self, _: &str, _: &ConstantValue) {}
        fn append_raw_statement(&mut self, _: &str) {}

        fn finalize(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "disk says no",
            ))
        }
    }

    fn no_backup() -> impl BackupService {
        |_: &Path| -> std::io::Result<()> { Ok(()) }
    }

    fn generated_at() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 5, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn updater<'d, E: CodeEmitter, B: BackupService>(
        doc: &'d ConfigDocument,
        emitter: E,
        backup: B,
    ) -> ConfigPhpUpdater<'d, E, B> {
        ConfigPhpUpdater::new(
            doc,
            emitter,
            backup,
            PathBuf::from(CONFIG_PHP_FILE),
            Some("staging".to_string()),
            generated_at(),
        )
    }

    #[test]
    fn unsupported_environment_fails_before_any_emission() {
        let doc = config_document! {r#"
        <envgen>
          <environments>
            <environment name="prod"/>
          </environments>
          <ConfigPHPFile>
            <config env="prod">
              <constant name="A" value="1"/>
            </config>
          </ConfigPHPFile>
        </envgen>
        "#};

        let mut updater = updater(&doc, RecordingEmitter::new(), no_backup());
        let err = updater.set_env("qa", false).unwrap_err();
        assert!(matches!(err, UpdaterError::UnsupportedEnvironment(env) if env == "qa"));
        assert_eq!(updater.emitter.ops, vec![]);

        let err = params_by_env(&doc, "qa").unwrap_err();
        assert!(matches!(err, UpdaterError::UnsupportedEnvironment(env) if env == "qa"));
    }

    #[test]
    fn absent_section_is_a_complete_no_op() {
        let doc = config_document! {r#"
        <envgen>
          <environments>
            <environment name="prod"/>
          </environments>
        </envgen>
        "#};

        let mut updater = updater(&doc, RecordingEmitter::new(), no_backup());
        updater.set_env("prod", false).unwrap();
        assert_eq!(updater.emitter.ops, vec![]);

        assert_eq!(params_by_env(&doc, "prod").unwrap(), vec![]);
    }

    #[test]
    fn missing_block_for_environment_errors() {
        let doc = config_document! {r#"
        <envgen>
          <environments>
            <environment name="prod"/>
            <environment name="staging"/>
          </environments>
          <ConfigPHPFile>
            <config env="prod">
              <constant name="A" value="1"/>
            </config>
          </ConfigPHPFile>
        </envgen>
        "#};

        let mut updater = updater(&doc, RecordingEmitter::new(), no_backup());
        let err = updater.set_env("staging", false).unwrap_err();
        assert!(matches!(
            &err,
            UpdaterError::SectionNotConfigured { section, env }
                if *section == CONFIG_PHP_SECTION && env == "staging"
        ));

        let err = params_by_env(&doc, "staging").unwrap_err();
        assert!(matches!(err, UpdaterError::SectionNotConfigured { .. }));
    }

    #[test]
    fn emits_header_comments_statements_and_separators() {
        let doc = config_document! {r#"
        <envgen>
          <environments>
            <environment name="prod"/>
          </environments>
          <ConfigPHPFile>
            <config env="prod">
              <constant name="SITE_URL" value="https://example.com" comment="entry point"/>
              <constant name="DEBUG" value="false" isBoolean="true"/>
              <customCode>run();</customCode>
            </config>
          </ConfigPHPFile>
        </envgen>
        "#};

        let mut updater = updater(&doc, RecordingEmitter::new(), no_backup());
        updater.set_env("prod", false).unwrap();

        assert_eq!(
            updater.emitter.ops,
            vec![
                Op::Comment("Generated by envgen. 2024-05-14 09:30".to_string()),
                Op::Empty,
                Op::Comment("entry point".to_string()),
                Op::Constant(
                    "SITE_URL".to_string(),
                    ConstantValue::Str("https://example.com".to_string())
                ),
                Op::Empty,
                Op::Constant("DEBUG".to_string(), ConstantValue::Bool(false)),
                Op::Empty,
                Op::Raw("run();".to_string()),
                Op::Empty,
                Op::Finalize,
            ]
        );
    }

    #[test]
    fn one_bad_declaration_does_not_abort_the_run() {
        let doc = config_document! {r#"
        <envgen>
          <environments>
            <environment name="prod"/>
          </environments>
          <ConfigPHPFile>
            <config env="prod">
              <constant name="A" value="1"/>
              <mystery comment="dropped with its comment">???</mystery>
              <constant name="B" value="2"/>
            </config>
          </ConfigPHPFile>
        </envgen>
        "#};

        let mut updater = updater(&doc, RecordingEmitter::new(), no_backup());
        updater.set_env("prod", false).unwrap();

        assert_eq!(
            updater.emitter.ops,
            vec![
                Op::Comment("Generated by envgen. 2024-05-14 09:30".to_string()),
                Op::Empty,
                Op::Constant("A".to_string(), ConstantValue::Str("1".to_string())),
                Op::Empty,
                Op::Constant("B".to_string(), ConstantValue::Str("2".to_string())),
                Op::Empty,
                Op::Finalize,
            ]
        );

        // the lenient path still sees all three declarations
        let params = params_by_env(&doc, "prod").unwrap();
        assert_eq!(
            params,
            vec![
                Parameter::new("A", "1"),
                Parameter::new("Custom Code", "???"),
                Parameter::new("B", "2"),
            ]
        );
    }

    #[test]
    fn finalize_failure_names_the_artifact() {
        let doc = config_document! {r#"
        <envgen>
          <environments>
            <environment name="prod"/>
          </environments>
          <ConfigPHPFile>
            <config env="prod">
              <constant name="A" value="1"/>
            </config>
          </ConfigPHPFile>
        </envgen>
        "#};

        let mut updater = updater(&doc, FailingEmitter, no_backup());
        let err = updater.set_env("prod", false).unwrap_err();
        assert_eq!(err.to_string(), "write error on file config.php");
    }

    #[test]
    fn backup_runs_only_when_requested() {
        let doc = config_document! {r#"
        <envgen>
          <environments>
            <environment name="prod"/>
          </environments>
          <ConfigPHPFile>
            <config env="prod">
              <constant name="A" value="1"/>
            </config>
          </ConfigPHPFile>
        </envgen>
        "#};

        let backups = Rc::new(RefCell::new(Vec::new()));
        let recorder = {
            let backups = Rc::clone(&backups);
            move |artifact: &Path| -> std::io::Result<()> {
                backups.borrow_mut().push(artifact.to_path_buf());
                Ok(())
            }
        };

        let mut updater = updater(&doc, RecordingEmitter::new(), recorder);
        updater.set_env("prod", false).unwrap();
        assert_eq!(backups.borrow().len(), 0);

        updater.set_env("prod", true).unwrap();
        assert_eq!(*backups.borrow(), vec![PathBuf::from(CONFIG_PHP_FILE)]);
    }

    #[test]
    fn extraction_preserves_document_order() {
        let doc = config_document! {r#"
        <envgen>
          <environments>
            <environment name="prod"/>
          </environments>
          <ConfigPHPFile>
            <config env="prod">
              <constant name="ZULU" value="26"/>
              <constant name="ALPHA" value="1"/>
              <constant name="MIKE" value="13"/>
            </config>
          </ConfigPHPFile>
        </envgen>
        "#};

        let names: Vec<_> = params_by_env(&doc, "prod")
            .unwrap()
            .into_iter()
            .map(|parameter| parameter.name)
            .collect();
        assert_eq!(names, vec!["ZULU", "ALPHA", "MIKE"]);
    }

    #[test]
    fn diff_pairs_current_and_target() {
        let doc = config_document! {r#"
        <envgen>
          <environments>
            <environment name="prod"/>
            <environment name="staging"/>
          </environments>
          <ConfigPHPFile>
            <config env="prod">
              <constant name="foo" value="1"/>
            </config>
            <config env="staging">
              <constant name="foo" value="2"/>
            </config>
          </ConfigPHPFile>
        </envgen>
        "#};

        let diff = diff_params_by_env(&doc, "staging", "prod").unwrap();
        assert_eq!(diff.current, vec![Parameter::new("foo", "2")]);
        assert_eq!(diff.target, vec![Parameter::new("foo", "1")]);

        // the trait surface resolves the current environment itself
        let updater = updater(&doc, RecordingEmitter::new(), no_backup());
        assert_eq!(updater.diff_params_by_env("prod").unwrap(), diff);
    }

    #[test]
    fn diff_without_current_environment_errors() {
        let doc = config_document! {r#"
        <envgen>
          <environments>
            <environment name="prod"/>
          </environments>
        </envgen>
        "#};

        let updater = ConfigPhpUpdater::new(
            &doc,
            RecordingEmitter::new(),
            no_backup(),
            PathBuf::from(CONFIG_PHP_FILE),
            None,
            generated_at(),
        );

        assert!(matches!(
            updater.diff_params_by_env("prod").unwrap_err(),
            UpdaterError::CurrentEnvironmentUnknown
        ));
    }
}
