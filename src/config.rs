//! Paths and file names used by a pipeline run

use std::path::PathBuf;

pub const DEFAULT_ARCHIVE_PATH: &str = "data/raw/netflix_data.zip";
pub const DEFAULT_WORKING_DIRECTORY: &str = ".";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "outputs";
pub const DEFAULT_SOURCE_FILE_NAME: &str = "netflix_data.csv";
pub const DEFAULT_CANONICAL_FILE_NAME: &str = "Netflix_shows_movies.csv";
pub const DEFAULT_CLEANED_FILE_NAME: &str = "Netflix_shows_movies_clean.csv";

/// Where a pipeline run reads its input and writes its artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Zip archive holding the raw catalog
    pub archive_path: PathBuf,
    /// Directory the archive is extracted into; also holds the cleaned table
    pub working_directory: PathBuf,
    /// Directory for charts, summary text and the JSON export
    pub output_directory: PathBuf,
    /// Name of the catalog file inside the archive
    pub source_file_name: String,
    /// Name the extracted catalog is renamed to
    pub canonical_file_name: String,
    pub cleaned_file_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            archive_path: PathBuf::from(DEFAULT_ARCHIVE_PATH),
            working_directory: PathBuf::from(DEFAULT_WORKING_DIRECTORY),
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            source_file_name: DEFAULT_SOURCE_FILE_NAME.to_string(),
            canonical_file_name: DEFAULT_CANONICAL_FILE_NAME.to_string(),
            cleaned_file_name: DEFAULT_CLEANED_FILE_NAME.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn canonical_path(&self) -> PathBuf {
        self.working_directory.join(&self.canonical_file_name)
    }

    pub fn cleaned_path(&self) -> PathBuf {
        self.working_directory.join(&self.cleaned_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = PipelineConfig::default();
        assert_eq!(config.archive_path, PathBuf::from("data/raw/netflix_data.zip"));
        assert_eq!(config.canonical_path(), PathBuf::from("./Netflix_shows_movies.csv"));
        assert_eq!(
            config.cleaned_path(),
            PathBuf::from("./Netflix_shows_movies_clean.csv")
        );
    }

    #[test]
    fn test_paths_follow_working_directory() {
        let config = PipelineConfig {
            working_directory: PathBuf::from("data/raw"),
            cleaned_file_name: "clean.csv".to_string(),
            ..Default::default()
        };
        assert_eq!(config.cleaned_path(), PathBuf::from("data/raw/clean.csv"));
    }
}
