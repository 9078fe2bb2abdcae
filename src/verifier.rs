//! zipsat: a zip archive password cracker

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};
use zip::{ZipArchive, result::ZipError};

use crate::{
    error::ZipsatError,
    types::{Candidate, Verification},
};

/// Something that can tell whether a candidate unlocks an archive.
///
/// `Err` is reserved for conditions no candidate could ever fix, like the archive not being
/// there at all. A wrong password is a normal [`Verification::WrongPassword`].
pub(crate) trait PasswordVerifier {
    fn verify(&self, candidate: &Candidate) -> Result<Verification, ZipsatError>;
}

/// Verifies candidates against a zip archive on disk.
///
/// Every call reopens the archive, so no decryption state carries over between candidates.
#[derive(Debug)]
pub(crate) struct ZipVerifier {
    archive_path: PathBuf,
}

impl ZipVerifier {
    pub(crate) fn new(archive_path: impl Into<PathBuf>) -> Self {
        ZipVerifier {
            archive_path: archive_path.into(),
        }
    }

    /// Like [`ZipVerifier::new`], but makes sure the archive can be opened before any candidate
    /// is tried.
    pub(crate) fn open(archive_path: impl Into<PathBuf>) -> Result<Self, ZipsatError> {
        let verifier = ZipVerifier::new(archive_path);
        let archive = verifier.open_archive()?;
        debug!(
            archive = %verifier.archive_path.display(),
            entries = archive.len(),
            "opened archive"
        );

        Ok(verifier)
    }

    pub(crate) fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    fn open_archive(&self) -> Result<ZipArchive<File>, ZipsatError> {
        let to_fatal = |source: ZipError| ZipsatError::ArchiveOpen {
            path: self.archive_path.clone(),
            source,
        };

        let file = File::open(&self.archive_path).map_err(|e| to_fatal(ZipError::from(e)))?;
        ZipArchive::new(file).map_err(to_fatal)
    }
}

impl PasswordVerifier for ZipVerifier {
    fn verify(&self, candidate: &Candidate) -> Result<Verification, ZipsatError> {
        // Dropped on every return below, which closes the file.
        let mut archive = self.open_archive()?;

        for idx in 0..archive.len() {
            let encrypted = match archive.by_index_raw(idx) {
                Ok(entry) => entry.encrypted(),
                Err(e) => {
                    debug!(entry = idx, error = %e, "failed to read entry header");
                    return Ok(Verification::WrongPassword);
                }
            };

            let entry = if encrypted {
                archive.by_index_decrypt(idx, candidate.as_bytes())
            } else {
                archive.by_index(idx)
            };

            let mut entry = match entry {
                Ok(entry) => entry,
                // No candidate gets past this one, so make it visible without RUST_LOG.
                Err(e @ ZipError::UnsupportedArchive(_)) => {
                    warn!(entry = idx, error = %e, "entry uses an unsupported zip feature");
                    return Ok(Verification::WrongPassword);
                }
                Err(e) => {
                    debug!(entry = idx, error = %e, "failed to open entry");
                    return Ok(Verification::WrongPassword);
                }
            };

            // Some schemes only notice a bad key when the checksum at the end of the stream
            // doesn't match, so the whole entry has to be read.
            if let Err(e) = io::copy(&mut entry, &mut io::sink()) {
                debug!(entry = idx, error = %e, "failed to read entry");
                return Ok(Verification::WrongPassword);
            }
        }

        Ok(Verification::Success)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;
    use tracing_test::traced_test;
    use zip::{
        AesMode, CompressionMethod, ZipWriter, unstable::write::FileOptionsExt,
        write::SimpleFileOptions,
    };

    use super::*;

    const PASSWORD: &str = "hunter2";
    const SECRET: &[u8] = b"the treasure is buried under the third palm tree from the left";

    /// Write a zip with the given `(name, contents, password)` entries.
    fn write_archive(
        dir: &TempDir,
        entries: &[(&str, &[u8], Option<&'static str>)],
    ) -> PathBuf {
        let path = dir.path().join("archive.zip");
        let mut zip = ZipWriter::new(File::create(&path).unwrap());

        for &(name, contents, password) in entries {
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            let options = match password {
                Some(password) => options.with_aes_encryption(AesMode::Aes256, password),
                None => options,
            };
            zip.start_file(name, options).unwrap();
            zip.write_all(contents).unwrap();
        }
        zip.finish().unwrap();

        path
    }

    #[test]
    fn unencrypted_archive_accepts_any_candidate() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(
            &dir,
            &[("a.txt", b"plain", None), ("b.txt", b"also plain", None)],
        );
        let verifier = ZipVerifier::new(&path);

        for candidate in ["", "whatever", PASSWORD] {
            assert_eq!(
                verifier.verify(&Candidate::from(candidate)).unwrap(),
                Verification::Success
            );
        }
    }

    #[test]
    fn empty_archive_accepts_any_candidate() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(&dir, &[]);

        assert_eq!(
            ZipVerifier::new(&path)
                .verify(&Candidate::from(""))
                .unwrap(),
            Verification::Success
        );
    }

    #[test]
    fn correct_password_succeeds() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(&dir, &[("secret.txt", SECRET, Some(PASSWORD))]);

        assert_eq!(
            ZipVerifier::new(&path)
                .verify(&Candidate::from(PASSWORD))
                .unwrap(),
            Verification::Success
        );
    }

    #[test]
    fn wrong_passwords_fail() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(&dir, &[("secret.txt", SECRET, Some(PASSWORD))]);
        let verifier = ZipVerifier::new(&path);

        for candidate in ["", "hunter", "hunter22", "Hunter2", "password", "123456"] {
            assert_eq!(
                verifier.verify(&Candidate::from(candidate)).unwrap(),
                Verification::WrongPassword,
                "candidate {candidate:?} should not unlock the archive"
            );
        }
    }

    #[test]
    fn partially_encrypted_archive_needs_password() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(
            &dir,
            &[
                ("readme.txt", b"nothing to see here", None),
                ("secret.txt", SECRET, Some(PASSWORD)),
            ],
        );
        let verifier = ZipVerifier::new(&path);

        assert_eq!(
            verifier.verify(&Candidate::from("nope")).unwrap(),
            Verification::WrongPassword
        );
        assert_eq!(
            verifier.verify(&Candidate::from(PASSWORD)).unwrap(),
            Verification::Success
        );
    }

    #[test]
    fn outcome_does_not_depend_on_previous_attempts() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(&dir, &[("secret.txt", SECRET, Some(PASSWORD))]);
        let verifier = ZipVerifier::new(&path);

        let first = verifier.verify(&Candidate::from(PASSWORD)).unwrap();
        let _ = verifier.verify(&Candidate::from("wrong")).unwrap();
        let again = verifier.verify(&Candidate::from(PASSWORD)).unwrap();

        assert_eq!(first, Verification::Success);
        assert_eq!(again, Verification::Success);
    }

    #[test]
    fn missing_archive_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("does-not-exist.zip");

        assert!(matches!(
            ZipVerifier::open(&path),
            Err(ZipsatError::ArchiveOpen { .. })
        ));
        assert!(matches!(
            ZipVerifier::new(&path).verify(&Candidate::from("anything")),
            Err(ZipsatError::ArchiveOpen { .. })
        ));
    }

    #[test]
    fn corrupt_archive_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.zip");
        std::fs::write(&path, b"this is definitely not a zip file").unwrap();

        match ZipVerifier::open(&path) {
            Err(ZipsatError::ArchiveOpen { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected ArchiveOpen, got {other:?}"),
        }
    }

    #[traced_test]
    #[test]
    fn wrong_password_is_logged_with_entry_index() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(
            &dir,
            &[
                ("readme.txt", b"nothing to see here", None),
                ("secret.txt", SECRET, Some(PASSWORD)),
            ],
        );

        let verification = ZipVerifier::new(&path)
            .verify(&Candidate::from("nope"))
            .unwrap();

        assert_eq!(verification, Verification::WrongPassword);
        assert!(logs_contain("entry=1"));
    }

    /// Write a single-entry ZipCrypto archive.
    fn write_zipcrypto_archive(dir: &TempDir, method: CompressionMethod) -> PathBuf {
        let path = dir.path().join("zipcrypto.zip");
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .with_deprecated_encryption(PASSWORD.as_bytes())
            .unwrap();
        zip.start_file("secret.txt", options).unwrap();
        zip.write_all(SECRET).unwrap();
        zip.finish().unwrap();

        path
    }

    /// Find a wrong candidate that ZipCrypto's one-byte header check lets through, so only the
    /// CRC at the end of the entry can reject it.
    fn header_check_collision(path: &Path) -> Candidate {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();

        (0..10_000)
            .map(|i| Candidate::from(format!("guess{i}").as_str()))
            .find(|candidate| archive.by_index_decrypt(0, candidate.as_bytes()).is_ok())
            .expect("roughly 1 in 256 wrong candidates passes the header check")
    }

    #[test]
    fn zipcrypto_wrong_password_is_caught_by_full_read() {
        for method in [CompressionMethod::Stored, CompressionMethod::Deflated] {
            let dir = TempDir::new().unwrap();
            let path = write_zipcrypto_archive(&dir, method);
            let verifier = ZipVerifier::new(&path);

            let collision = header_check_collision(&path);
            assert_ne!(collision, Candidate::from(PASSWORD));

            assert_eq!(
                verifier.verify(&collision).unwrap(),
                Verification::WrongPassword,
                "{method:?}: {collision} opened the entry but must fail on read"
            );
            assert_eq!(
                verifier.verify(&Candidate::from(PASSWORD)).unwrap(),
                Verification::Success,
                "{method:?}"
            );
        }
    }

    #[traced_test]
    #[test]
    fn unsupported_compression_method_is_a_warning() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(&dir, &[("a.txt", b"plain", None)]);

        // Rewrite the compression method of the only entry, in both the local header and the
        // central directory, to one no zip implementation knows.
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[8..10].copy_from_slice(&200u16.to_le_bytes());
        let central = bytes
            .windows(4)
            .position(|w| w == b"PK\x01\x02")
            .unwrap();
        bytes[central + 10..central + 12].copy_from_slice(&200u16.to_le_bytes());
        std::fs::write(&path, bytes).unwrap();

        let verification = ZipVerifier::open(&path)
            .unwrap()
            .verify(&Candidate::from(""))
            .unwrap();

        assert_eq!(verification, Verification::WrongPassword);
        assert!(logs_contain("WARN"));
        assert!(logs_contain("unsupported zip feature"));
    }
}
