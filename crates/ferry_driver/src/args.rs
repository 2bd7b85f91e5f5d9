//! Command line arguments

use clap::{Parser, Subcommand, ValueEnum};
use ferry_resolve::NameStrictness;
use ferry_symbols::ConventionMode;
use std::path::PathBuf;

/// Resolve member bindings and plan call emission
#[derive(Parser)]
#[command(name = "ferry", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./ferry.yml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Convention used when nothing in the model picks one
    #[arg(long, global = true, value_enum)]
    pub convention: Option<ConventionArg>,

    /// Treatment of one explicit name shared by unrelated types
    #[arg(long, global = true, value_enum)]
    pub cross_type_names: Option<StrictnessArg>,

    /// Worker threads for plan building
    #[arg(long, global = true)]
    pub threads: Option<usize>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the binding plan of every member
    Plan {
        /// Symbol model exported by the front end (JSON)
        model: PathBuf,
    },

    /// Report binding diagnostics only
    Check { model: PathBuf },

    /// Expand one member at a call site
    Expand {
        model: PathBuf,

        /// `Type.Member` or `Namespace.Type.Member`
        #[arg(long)]
        member: String,

        /// Receiver expression
        #[arg(long)]
        receiver: Option<String>,

        /// Argument expression, repeatable
        #[arg(long = "arg")]
        args: Vec<String>,
    },

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConventionArg {
    AsDeclared,
    LowerCamel,
    UpperCamel,
}

impl From<ConventionArg> for ConventionMode {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::AsDeclared => ConventionMode::AsDeclared,
            ConventionArg::LowerCamel => ConventionMode::LowerCamelCase,
            ConventionArg::UpperCamel => ConventionMode::UpperCamelCase,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrictnessArg {
    Allow,
    Warn,
    Deny,
}

impl From<StrictnessArg> for NameStrictness {
    fn from(arg: StrictnessArg) -> Self {
        match arg {
            StrictnessArg::Allow => NameStrictness::Allow,
            StrictnessArg::Warn => NameStrictness::Warn,
            StrictnessArg::Deny => NameStrictness::Deny,
        }
    }
}
