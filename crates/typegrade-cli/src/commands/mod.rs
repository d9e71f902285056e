//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::{Context, Result};

pub mod evaluate;
pub mod init;
pub mod run;
pub mod score;
pub mod validate;

/// Text given either as a file path or inline on the command line.
#[derive(Debug, Clone)]
pub enum TextSource {
    File(PathBuf),
    Inline(String),
}

impl TextSource {
    /// clap guarantees exactly one of the two is present.
    pub fn new(file: Option<PathBuf>, inline: Option<String>) -> Self {
        match file {
            Some(path) => TextSource::File(path),
            None => TextSource::Inline(inline.unwrap_or_default()),
        }
    }

    pub fn read(&self) -> Result<String> {
        match self {
            TextSource::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
            TextSource::Inline(text) => Ok(text.clone()),
        }
    }
}

/// Split a comma-separated list, dropping empty entries.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_skips_empty() {
        assert_eq!(split_list(" json, html,,md "), vec!["json", "html", "md"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn file_source_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.txt");
        std::fs::write(&path, "o gato").unwrap();

        let source = TextSource::new(Some(path), Some("ignored".into()));
        assert_eq!(source.read().unwrap(), "o gato");
        assert_eq!(TextSource::new(None, Some("sim".into())).read().unwrap(), "sim");
    }
}
