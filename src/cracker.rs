//! zipsat: a zip archive password cracker

use std::{io::Write, path::Path, time::Instant};

use tracing::{debug, info};

use crate::{
    error::ZipsatError,
    types::{SearchOutcome, Verification, Wordlist},
    verifier::{PasswordVerifier, ZipVerifier},
};

/// Search the zip archive at `archive_path` with `wordlist`.
///
/// The archive is opened once before the first candidate, so a missing or corrupt archive is
/// reported without anything being written to `reporter`.
pub(crate) fn crack_archive<W: Write>(
    archive_path: &Path,
    wordlist: &Wordlist,
    reporter: &mut W,
) -> Result<SearchOutcome, ZipsatError> {
    let verifier = ZipVerifier::open(archive_path)?;
    info!(archive = %verifier.archive_path().display(), "cracking");

    crack(&verifier, wordlist, reporter)
}

/// Try every candidate in `wordlist`, in order, until one unlocks the archive.
///
/// Each candidate is announced on `reporter` before it is tried. The search stops at the first
/// [`Verification::Success`]; later candidates are never tried. An error from the verifier means
/// the archive itself is unusable and is returned as-is.
pub(crate) fn crack<V, W>(
    verifier: &V,
    wordlist: &Wordlist,
    reporter: &mut W,
) -> Result<SearchOutcome, ZipsatError>
where
    V: PasswordVerifier,
    W: Write,
{
    let start = Instant::now();

    for (idx, candidate) in wordlist.iter().enumerate() {
        writeln!(reporter, "Trying password: {candidate}")?;
        reporter.flush()?;

        match verifier.verify(candidate)? {
            Verification::Success => {
                let tries = idx + 1;
                info!(tries, "password found");

                return Ok(SearchOutcome::Found {
                    password: candidate.clone(),
                    tries,
                    elapsed: start.elapsed(),
                });
            }
            Verification::WrongPassword => debug!(candidate = idx, "wrong password"),
        }
    }

    info!(tries = wordlist.len(), "wordlist exhausted");

    Ok(SearchOutcome::Exhausted {
        tries: wordlist.len(),
        elapsed: start.elapsed(),
    })
}

/// Format a [`std::time::Duration`] in the `1h 2m 3s` format.
pub(crate) fn format_duration(duration: std::time::Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else if seconds > 0 {
        format!("{seconds}s")
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Format a number with commas as the thousands separator.
pub(crate) fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

    for (idx, digit) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }

    formatted
}
