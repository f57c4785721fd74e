//! Archive extraction for the raw catalog
//!
//! Extracts every member of the zip archive into the working directory, then renames
//! the known source file to the canonical name the rest of the pipeline reads.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::ZipArchive;

/// Errors that can occur while unpacking the archive
#[derive(Error, Debug)]
pub enum UnpackError {
    #[error("Archive does not exist: {0}")]
    ArchiveNotFound(PathBuf),

    #[error("Failed to read archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to extract archive: {0}")]
    Io(#[from] io::Error),

    #[error("Archive entry escapes the working directory: {0}")]
    UnsafeEntry(String),
}

type Result<T> = core::result::Result<T, UnpackError>;

/// What an extraction produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Size of the archive file in bytes
    pub archive_size: u64,
    /// Files written; directory entries are not counted
    pub files_extracted: usize,
    /// Uncompressed bytes written
    pub bytes_extracted: u64,
}

/// Extracts every member of `archive_path` under `working_directory`
///
/// The working directory is created if absent. Members whose path is absolute or
/// climbs out of the directory are rejected with [`UnpackError::UnsafeEntry`].
pub fn extract_archive(archive_path: &Path, working_directory: &Path) -> Result<Extraction> {
    if !archive_path.is_file() {
        return Err(UnpackError::ArchiveNotFound(archive_path.to_path_buf()));
    }

    fs::create_dir_all(working_directory)?;

    let file = File::open(archive_path)?;
    let archive_size = file.metadata()?.len();
    let mut archive = ZipArchive::new(file)?;
    let mut extraction = Extraction {
        archive_size,
        ..Default::default()
    };

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(UnpackError::UnsafeEntry(entry.name().to_string()));
        };
        let destination = working_directory.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&destination)?;
            continue;
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut output = File::create(&destination)?;
        extraction.bytes_extracted += io::copy(&mut entry, &mut output)?;
        extraction.files_extracted += 1;
        tracing::debug!(path = %destination.display(), "Extracted archive member");
    }

    Ok(extraction)
}

/// Renames `source_file_name` to `canonical_file_name` inside `working_directory`
///
/// An existing canonical file is replaced. Returns `Ok(None)` without touching
/// anything when the source file does not exist.
pub fn rename_to_canonical(
    working_directory: &Path,
    source_file_name: &str,
    canonical_file_name: &str,
) -> Result<Option<PathBuf>> {
    let source = working_directory.join(source_file_name);
    let canonical = working_directory.join(canonical_file_name);

    if !source.is_file() {
        tracing::warn!(path = %source.display(), "Source file not found after extraction");
        return Ok(None);
    }

    if source == canonical {
        return Ok(Some(canonical));
    }

    // rename does not replace existing files on every platform
    if canonical.exists() {
        fs::remove_file(&canonical)?;
    }
    fs::rename(&source, &canonical)?;
    Ok(Some(canonical))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_archive(path: &Path, members: &[(&str, &str)]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        for (name, content) in members {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extract_creates_directory_and_members() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("netflix_data.zip");
        write_archive(
            &archive,
            &[
                ("netflix_data.csv", "title,type\nA,Movie\n"),
                ("docs/readme.txt", "catalog"),
            ],
        );

        let working_directory = temp_dir.path().join("data").join("raw");
        let extraction = extract_archive(&archive, &working_directory).unwrap();

        assert_eq!(extraction.files_extracted, 2);
        assert_eq!(extraction.bytes_extracted, 26);
        assert!(extraction.archive_size > 0);
        assert_eq!(
            fs::read_to_string(working_directory.join("docs").join("readme.txt")).unwrap(),
            "catalog"
        );
    }

    #[test]
    fn test_missing_archive() {
        let temp_dir = TempDir::new().unwrap();
        let result = extract_archive(&temp_dir.path().join("absent.zip"), temp_dir.path());
        assert!(matches!(result, Err(UnpackError::ArchiveNotFound(_))));
    }

    #[test]
    fn test_corrupt_archive() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("corrupt.zip");
        fs::write(&archive, [0x00, 0x01, 0x02, 0x03, 0x04, 0x05]).unwrap();

        let result = extract_archive(&archive, &temp_dir.path().join("out"));
        assert!(matches!(result, Err(UnpackError::Zip(_))));
    }

    #[test]
    fn test_rejects_escaping_member() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("evil.zip");
        write_archive(&archive, &[("../escaped.csv", "x")]);

        let working_directory = temp_dir.path().join("work");
        let result = extract_archive(&archive, &working_directory);
        assert!(matches!(result, Err(UnpackError::UnsafeEntry(_))));
        assert!(!temp_dir.path().join("escaped.csv").exists());
    }

    #[test]
    fn test_rename_replaces_existing_canonical_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("netflix_data.csv"), "new").unwrap();
        fs::write(temp_dir.path().join("Netflix_shows_movies.csv"), "old").unwrap();

        let renamed =
            rename_to_canonical(temp_dir.path(), "netflix_data.csv", "Netflix_shows_movies.csv")
                .unwrap();

        let canonical = temp_dir.path().join("Netflix_shows_movies.csv");
        assert_eq!(renamed, Some(canonical.clone()));
        assert_eq!(fs::read_to_string(canonical).unwrap(), "new");
        assert!(!temp_dir.path().join("netflix_data.csv").exists());
    }

    #[test]
    fn test_rename_missing_source_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let renamed =
            rename_to_canonical(temp_dir.path(), "netflix_data.csv", "Netflix_shows_movies.csv")
                .unwrap();
        assert_eq!(renamed, None);
    }
}
