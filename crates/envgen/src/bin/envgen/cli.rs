//! envgen cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; envgen ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the configuration artifact for an environment
    #[command(alias = "gen")]
    Generate(GenerateCommand),

    /// List the parameters an environment would generate
    Params(ParamsCommand),

    /// Compare parameters between the active and a candidate environment
    Diff(DiffCommand),

    /// Print debug information for development
    Dev(DevCommand),
}

#[derive(Parser, Debug)]
pub struct GenerateCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Environment to generate for
    #[clap(short, long)]
    pub env: String,

    /// Back up the previous artifact before generating
    #[clap(short, long)]
    pub backup: bool,

    /// Path of the generated artifact
    #[clap(short, long, default_value = envgen::updater::CONFIG_PHP_FILE)]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ParamsCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    /// Environment to list
    #[clap(short, long)]
    pub env: String,
}

#[derive(Parser, Debug)]
pub struct DiffCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    /// Candidate environment
    #[clap(short, long)]
    pub target: String,

    /// Active environment
    ///
    /// Defaults to the spec document's environments/@current attribute.
    #[clap(short, long)]
    pub current: Option<String>,
}

#[derive(Parser, Debug)]
pub struct InputArgs {
    /// Path of the XML spec document ("-" reads stdin)
    #[clap(short = 'f', long = "spec", default_value = "envgen.xml")]
    pub spec: PathBuf,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

#[derive(Parser, Debug)]
pub struct DevCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[command(subcommand)]
    pub command: DevSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum DevSubCommand {
    Document,
}
