mod commands;
mod config;
mod console;

use clap::{Parser, Subcommand};
use config::CliConfig;
use fairdice_core::{ErrorKind, FairDiceError, StrategyKind};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fairdice")]
#[command(about = "Provably fair non-transitive dice against the computer")]
#[command(version)]
struct Cli {
    /// Config file (defaults to <config dir>/fairdice/config.json when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one match; each die is six comma-separated integers
    Play {
        /// At least three dice, e.g. 2,2,4,4,9,9 1,1,6,6,8,8 3,3,5,5,7,7
        /// (faces may be negative; give flags before the dice)
        #[arg(required = true, allow_hyphen_values = true)]
        dice: Vec<String>,
        /// How the computer picks its die: first, random or best
        #[arg(long)]
        strategy: Option<StrategyKind>,
        /// Read plain lines from stdin; invalid input ends the match
        #[arg(long)]
        plain: bool,
        /// Skip the probability table
        #[arg(long)]
        no_table: bool,
        /// Print the audit transcript as JSON after the match
        #[arg(long)]
        report: bool,
    },
    /// Show pairwise win/loss/draw odds for a set of dice
    Table {
        #[arg(required = true, allow_hyphen_values = true)]
        dice: Vec<String>,
    },
    /// Check a revealed key and value against a published HMAC
    Verify {
        /// Revealed key (hex)
        #[arg(long)]
        key: String,
        /// Revealed value
        #[arg(long)]
        value: u64,
        /// HMAC published before the reveal (hex)
        #[arg(long)]
        mac: String,
    },
}

fn exit_code(err: &FairDiceError) -> i32 {
    match err.kind() {
        ErrorKind::Validation => 1,
        ErrorKind::InputAbort => 2,
        ErrorKind::ProtocolViolation => 3,
        ErrorKind::Internal => 4,
    }
}

/// Help and version keep clap's own exit; usage errors are validation errors
fn usage_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(usage_exit_code(&e));
        }
    };

    let mut config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.verbose |= cli.verbose;

    // Initialize logging
    let log_level = if config.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "fairdice={},fairdice_core={}",
            log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Play {
            dice,
            strategy,
            plain,
            no_table,
            report,
        } => {
            if let Some(strategy) = strategy {
                config.strategy = strategy;
            }
            config.plain_input |= plain;
            config.show_probability_table &= !no_table;
            commands::play(&dice, &config, report)
        }
        Commands::Table { dice } => commands::show_table(&dice),
        Commands::Verify { key, value, mac } => commands::verify(&key, value, &mac),
    };

    if let Err(e) = result {
        match &e {
            FairDiceError::TooFewDice { .. } | FairDiceError::InvalidDie(_) => {
                eprintln!("Error: {}", e);
                eprintln!("Example: fairdice play 2,2,4,4,9,9 1,1,6,6,8,8 3,3,5,5,7,7");
            }
            FairDiceError::ProtocolViolation(_) => {
                eprintln!("Error: {}", e);
                eprintln!("The outcome must not be trusted.");
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(exit_code(&e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_faces_without_separator() {
        let cli = Cli::try_parse_from([
            "fairdice",
            "play",
            "--no-table",
            "2,2,4,4,9,9",
            "-1,0,1,-1,0,1",
            "3,3,5,5,7,7",
        ])
        .unwrap();

        match cli.command {
            Commands::Play { dice, no_table, .. } => {
                assert!(no_table);
                assert_eq!(dice, ["2,2,4,4,9,9", "-1,0,1,-1,0,1", "3,3,5,5,7,7"]);
            }
            _ => panic!("expected play"),
        }

        let cli = Cli::try_parse_from([
            "fairdice",
            "table",
            "-1,0,1,-1,0,1",
            "1,1,1,1,1,1",
            "0,0,0,0,0,0",
        ])
        .unwrap();
        match cli.command {
            Commands::Table { dice } => assert_eq!(dice[0], "-1,0,1,-1,0,1"),
            _ => panic!("expected table"),
        }
    }

    #[test]
    fn test_usage_errors_exit_as_validation() {
        let err = Cli::try_parse_from(["fairdice", "play", "--no-table"]).err().unwrap();
        assert_eq!(usage_exit_code(&err), 1);

        let err = Cli::try_parse_from(["fairdice", "launch"]).err().unwrap();
        assert_eq!(usage_exit_code(&err), 1);

        let err = Cli::try_parse_from(["fairdice", "--help"]).err().unwrap();
        assert_eq!(usage_exit_code(&err), 0);

        assert_ne!(
            usage_exit_code(&err),
            exit_code(&FairDiceError::input_aborted("eof"))
        );
    }

    #[test]
    fn test_parse_play_with_negative_faces() {
        let cli = Cli::try_parse_from([
            "fairdice",
            "play",
            "--strategy",
            "best",
            "--",
            "-1,0,1,-1,0,1",
            "1,1,6,6,8,8",
            "3,3,5,5,7,7",
        ])
        .unwrap();

        match cli.command {
            Commands::Play { dice, strategy, .. } => {
                assert_eq!(dice.len(), 3);
                assert_eq!(dice[0], "-1,0,1,-1,0,1");
                assert_eq!(strategy, Some(StrategyKind::Best));
            }
            _ => panic!("expected play"),
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&FairDiceError::invalid_die("x")), 1);
        assert_eq!(exit_code(&FairDiceError::input_aborted("eof")), 2);
        assert_eq!(exit_code(&FairDiceError::protocol_violation("mac")), 3);
    }

    #[test]
    fn test_verify_command() {
        use fairdice_core::{CommitmentScheme, HmacSha256, SecretKey};

        let key = SecretKey::from_bytes([5; 32]);
        let mac = HmacSha256::commit(&key, 2).to_string();

        assert!(commands::verify(&key.to_hex(), 2, &mac).is_ok());
        let err = commands::verify(&key.to_hex(), 3, &mac).unwrap_err();
        assert_eq!(exit_code(&err), 3);
    }
}
