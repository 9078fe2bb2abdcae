//! zipsat: a zip archive password cracker

use std::{ffi::OsString, path::PathBuf};

use clap::Parser;

use crate::types::Target;

#[derive(Parser, Debug)]
#[command(
    version,
    name = "zipsat",
    about = "Brute force zip file password.",
    after_help = "If no wordlist is passed, the built-in wordlist is used."
)]
pub(crate) struct Arguments {
    #[arg(value_name = "zipfile", help = "Path to the zip file")]
    pub(crate) archive: Option<PathBuf>,

    #[arg(value_name = "wordlist", help = "Path to a wordlist file, one password per line")]
    pub(crate) wordlist: Option<PathBuf>,

    /// Anything past the wordlist. Only collected so it can be rejected with the usage text.
    #[arg(hide = true)]
    pub(crate) extra: Vec<OsString>,

    #[arg(short, long, help = "Don't print each password as it is tried")]
    pub(crate) quiet: bool,
}

/// Parse the CLI arguments into a [`Target`].
///
/// Returns `None` when there is nothing to crack (no archive, or too many positional arguments),
/// in which case the caller should print the usage text.
pub(crate) fn parse_cli_arguments(args: Arguments) -> Option<Target> {
    if !args.extra.is_empty() {
        return None;
    }

    Some(Target {
        archive_path: args.archive?,
        wordlist_path: args.wordlist,
        quiet: args.quiet,
    })
}
