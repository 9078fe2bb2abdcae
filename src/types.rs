//! zipsat: a zip archive password cracker

use core::fmt;
use std::{path::PathBuf, time::Duration};

/// A single password to try against the archive.
///
/// Stored as raw bytes: wordlists in the wild carry lines that are not valid UTF-8, and zip
/// passwords are byte strings anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate(Vec<u8>);

impl Candidate {
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Candidate {
    fn from(bytes: Vec<u8>) -> Self {
        Candidate(bytes)
    }
}

impl From<&str> for Candidate {
    fn from(s: &str) -> Self {
        Candidate(s.as_bytes().to_vec())
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Where the candidates came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WordlistSource {
    /// A wordlist file given on the command line.
    File(PathBuf),
    /// The list embedded in the binary.
    BuiltIn,
}

impl fmt::Display for WordlistSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordlistSource::File(path) => write!(f, "{}", path.display()),
            WordlistSource::BuiltIn => write!(f, "built-in wordlist"),
        }
    }
}

/// An ordered list of candidates. Duplicates and empty lines are kept as-is.
#[derive(Debug)]
pub(crate) struct Wordlist {
    pub(crate) source: WordlistSource,
    pub(crate) candidates: Vec<Candidate>,
}

impl Wordlist {
    pub(crate) fn len(&self) -> usize {
        self.candidates.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }
}

/// Result of checking one candidate against the archive.
///
/// A failure to open the archive itself is not a verification result; it is returned as an
/// error so it aborts the whole search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verification {
    /// Every entry opened and read to the end.
    Success,
    /// Some entry failed to open or failed mid-read.
    WrongPassword,
}

/// How a search ended.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SearchOutcome {
    Found {
        password: Candidate,
        tries: usize,
        elapsed: Duration,
    },
    Exhausted {
        tries: usize,
        elapsed: Duration,
    },
}

impl SearchOutcome {
    pub(crate) fn tries(&self) -> usize {
        match self {
            SearchOutcome::Found { tries, .. } | SearchOutcome::Exhausted { tries, .. } => *tries,
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        match self {
            SearchOutcome::Found { elapsed, .. } | SearchOutcome::Exhausted { elapsed, .. } => {
                *elapsed
            }
        }
    }
}

/// Abstract representation of a cracking job, as parsed from the CLI.
#[derive(Debug)]
pub(crate) struct Target {
    /// The encrypted zip archive.
    pub(crate) archive_path: PathBuf,
    /// The wordlist file. The built-in list is used if this is left empty.
    pub(crate) wordlist_path: Option<PathBuf>,
    /// Don't print each candidate as it is tried.
    pub(crate) quiet: bool,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "archive: {}", self.archive_path.display())?;
        write!(
            f,
            "wordlist: {}",
            self.wordlist_path
                .as_ref()
                .map_or("built-in".to_string(), |p| p.display().to_string())
        )
    }
}
