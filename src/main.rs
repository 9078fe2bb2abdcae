//! zipsat: a zip archive password cracker

use clap::{CommandFactory, Parser};
use error::ZipsatError;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub(crate) mod cli;
pub(crate) mod cracker;
pub(crate) mod error;
pub(crate) mod types;
pub(crate) mod verifier;
pub(crate) mod wordlist;

use crate::cli::{Arguments, parse_cli_arguments};
use crate::cracker::{crack_archive, format_duration, format_number};
use crate::types::{SearchOutcome, Target};
use crate::wordlist::load_wordlist;

fn main() -> Result<(), ZipsatError> {
    init_logging();

    let args: Arguments = Arguments::parse();
    let Some(target) = parse_cli_arguments(args) else {
        Arguments::command().print_help()?;
        return Ok(());
    };

    match run(&target) {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("err: {e}");
            std::process::exit(1)
        }
    }
}

/// Set up logging on stderr, so it never interleaves with the progress on stdout.
///
/// Accepted `RUST_LOG` values are `trace`, `debug`, `info`, `warn`, and `error`.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Unable to set global default subscriber");
    }
}

fn run(target: &Target) -> Result<(), ZipsatError> {
    tracing::debug!(%target, "starting");

    if target.wordlist_path.is_none() {
        println!("No wordlist specified, using built-in default wordlist.");
    }
    let wordlist = load_wordlist(target.wordlist_path.as_deref())?;
    let outcome = if target.quiet {
        crack_archive(&target.archive_path, &wordlist, &mut std::io::sink())?
    } else {
        crack_archive(&target.archive_path, &wordlist, &mut std::io::stdout().lock())?
    };

    match &outcome {
        SearchOutcome::Found { password, .. } => println!("Password found: {password}"),
        SearchOutcome::Exhausted { .. } => println!("Password not found in wordlist."),
    }
    println!(
        "({} tries in {})",
        format_number(outcome.tries()),
        format_duration(outcome.elapsed())
    );

    Ok(())
}
