use apicheck::domain::models::Severity;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "apicheck",
    version,
    about = "API client contract conformance checker"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        default_value = "warn",
        help = "Log filter for stderr (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare a candidate descriptor against the reference contract.
    Validate {
        #[arg(long, help = "Reference descriptor (file, or dir with descriptor.json)")]
        reference: PathBuf,
        #[arg(long, help = "Candidate descriptor (file, or dir with descriptor.json)")]
        candidate: PathBuf,
        #[arg(long, help = "Rule config (defaults to ./apicheck.toml when present)")]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = MinSeverity::Warn)]
        min_severity: MinSeverity,
    },
    /// List every rule in the catalog.
    ListRules,
    /// Show full metadata for one rule.
    Explain { rule_id: String },
    /// Validate a rule config file.
    CheckConfig { path: PathBuf },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MinSeverity {
    Warn,
    Error,
}

impl MinSeverity {
    pub fn severity(self) -> Severity {
        match self {
            MinSeverity::Warn => Severity::Warning,
            MinSeverity::Error => Severity::Error,
        }
    }
}
