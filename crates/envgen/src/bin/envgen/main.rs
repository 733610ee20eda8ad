mod cli;

use envgen::backup::TimestampedBackup;
use envgen::document::ConfigDocument;
use envgen::emitter::PhpEmitter;
use envgen::updater::{self, ConfigPhpUpdater, FileUpdater, UpdaterError};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("ENVGEN_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Generate(generate_cli) => generate(generate_cli),
        cli::Command::Params(params_cli) => params(params_cli),
        cli::Command::Diff(diff_cli) => diff(diff_cli),
        cli::Command::Dev(dev_cli) => dev(dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn generate(cli: cli::GenerateCommand) -> anyhow::Result<()> {
    let document = load(&cli.input)?;

    let emitter = PhpEmitter::new(&cli.output);
    let mut updater = ConfigPhpUpdater::new(
        &document,
        emitter,
        TimestampedBackup,
        cli.output.clone(),
        None,
        chrono::Local::now().naive_local(),
    );

    updater.set_env(&cli.env, cli.backup)?;
    Ok(())
}

pub fn params(cli: cli::ParamsCommand) -> anyhow::Result<()> {
    let document = load(&cli.input)?;
    let params = updater::params_by_env(&document, &cli.env)?;

    output(&cli.output, &params)?;
    Ok(())
}

pub fn diff(cli: cli::DiffCommand) -> anyhow::Result<()> {
    let document = load(&cli.input)?;

    let current = cli
        .current
        .as_deref()
        .or_else(|| document.current_environment())
        .ok_or(UpdaterError::CurrentEnvironmentUnknown)?;
    let diff = updater::diff_params_by_env(&document, current, &cli.target)?;

    output(&cli.output, &diff)?;
    Ok(())
}

fn load(input: &cli::InputArgs) -> anyhow::Result<ConfigDocument> {
    if input.spec.as_os_str() == "-" {
        let stdin = std::io::read_to_string(std::io::stdin())?;
        return Ok(ConfigDocument::parse(&stdin)?);
    }

    Ok(ConfigDocument::load_file(&input.spec)?)
}

fn output(output: &cli::OutputArgs, value: &impl serde::Serialize) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), value)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), value)?,
    };

    Ok(())
}

/// (envgen-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    use cli::DevSubCommand::*;

    let document = load(&cli.input)?;

    match cli.command {
        Document => println!("{document:#?}"),
    }

    Ok(())
}
