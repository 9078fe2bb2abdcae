//! zipsat: a zip archive password cracker

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use tracing::info;

use crate::{
    error::ZipsatError,
    types::{Candidate, Wordlist, WordlistSource},
};

/// The wordlist shipped inside the binary, one password per line.
const DEFAULT_WORDLIST: &str = include_str!("../wordlists/default.txt");

/// Load candidates from `path`, or from the built-in list if there's none.
pub(crate) fn load_wordlist(path: Option<&Path>) -> Result<Wordlist, ZipsatError> {
    let wordlist = match path {
        Some(path) => load_from_file(path)?,
        None => builtin_wordlist()?,
    };
    info!(
        source = %wordlist.source,
        candidates = wordlist.len(),
        "loaded wordlist"
    );

    Ok(wordlist)
}

fn load_from_file(path: &Path) -> Result<Wordlist, ZipsatError> {
    let to_fatal = |source: io::Error| ZipsatError::WordlistLoad {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(to_fatal)?;
    let candidates = read_candidates(BufReader::new(file)).map_err(to_fatal)?;

    Ok(Wordlist {
        source: WordlistSource::File(path.to_path_buf()),
        candidates,
    })
}

fn builtin_wordlist() -> Result<Wordlist, ZipsatError> {
    Ok(Wordlist {
        source: WordlistSource::BuiltIn,
        candidates: read_candidates(DEFAULT_WORDLIST.as_bytes())?,
    })
}

/// Split `reader` into one candidate per line.
///
/// Only the line terminator (`\n` or `\r\n`) is stripped. Blank lines are kept as empty
/// candidates, and a trailing newline at the end of the input doesn't add one.
fn read_candidates(reader: impl BufRead) -> io::Result<Vec<Candidate>> {
    reader
        .split(b'\n')
        .map(|line| {
            line.map(|mut line| {
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                Candidate::from(line)
            })
        })
        .collect()
}
