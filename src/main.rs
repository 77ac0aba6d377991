use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

pub use apicheck::descriptor::load_descriptor;
pub use apicheck::domain::constants::exit_codes;
pub use apicheck::domain::models::*;
pub use apicheck::services::aggregate::filter_min_severity;
pub use apicheck::services::config::{load_config, read_config, unknown_rule_ids};
pub use apicheck::services::engine::check_raw;
pub use apicheck::services::output::{diagnostic_row, print_one, print_out};
pub use apicheck::services::registry::{catalog, find_rule};
pub use cli::{Cli, Commands, MinSeverity};

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Commands::Validate {
            reference,
            candidate,
            config,
            min_severity,
        } => commands::handle_validate(
            cli,
            reference,
            candidate,
            config.as_deref(),
            *min_severity,
        ),
        Commands::ListRules => commands::handle_list_rules(cli),
        Commands::Explain { rule_id } => commands::handle_explain(cli, rule_id),
        Commands::CheckConfig { path } => commands::handle_check_config(cli, path),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            if cli.json {
                let out = JsonOut {
                    ok: false,
                    data: ErrorReport {
                        error: format!("{err:#}"),
                    },
                };
                match serde_json::to_string_pretty(&out) {
                    Ok(text) => println!("{text}"),
                    Err(_) => eprintln!("error: {err:#}"),
                }
            } else {
                eprintln!("error: {err:#}");
            }
            ExitCode::from(exit_codes::MALFORMED)
        }
    }
}
