//! TOML attempt set parser.
//!
//! Loads attempt sets from TOML files and directories, and validates them.
//! Transcripts can be inline or point at files next to the TOML.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Attempt, AttemptSet};
use crate::normalizer::tokenize;

/// Intermediate TOML structure for parsing attempt set files.
#[derive(Debug, Deserialize)]
struct TomlAttemptFile {
    attempt_set: TomlAttemptSetHeader,
    #[serde(default)]
    attempts: Vec<TomlAttempt>,
}

#[derive(Debug, Deserialize)]
struct TomlAttemptSetHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlAttempt {
    id: String,
    #[serde(default)]
    audio_id: String,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    reference_file: Option<String>,
    #[serde(default)]
    typed: Option<String>,
    #[serde(default)]
    typed_file: Option<String>,
    #[serde(default)]
    wpm: Option<f64>,
    #[serde(default)]
    elapsed_secs: Option<f64>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Parse a single TOML file into an `AttemptSet`.
pub fn parse_attempt_set(path: &Path) -> Result<AttemptSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read attempt set file: {}", path.display()))?;

    parse_attempt_set_str(&content, path)
}

/// Parse a TOML string into an `AttemptSet`.
///
/// `reference_file` / `typed_file` entries are resolved against the
/// directory of `source_path`.
pub fn parse_attempt_set_str(content: &str, source_path: &Path) -> Result<AttemptSet> {
    let parsed: TomlAttemptFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let base_dir = source_path.parent().unwrap_or_else(|| Path::new("."));

    let attempts = parsed
        .attempts
        .into_iter()
        .map(|a| {
            let reference = resolve_text(a.reference, a.reference_file.as_deref(), base_dir)
                .with_context(|| format!("attempt '{}': failed to load reference", a.id))?;
            let typed = resolve_text(a.typed, a.typed_file.as_deref(), base_dir)
                .with_context(|| format!("attempt '{}': failed to load typed text", a.id))?;

            Ok(Attempt {
                id: a.id,
                audio_id: a.audio_id,
                reference,
                typed: typed.unwrap_or_default(),
                wpm: a.wpm,
                elapsed_secs: a.elapsed_secs,
                tags: a.tags,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AttemptSet {
        id: parsed.attempt_set.id,
        name: parsed.attempt_set.name,
        description: parsed.attempt_set.description,
        attempts,
    })
}

/// Inline text wins; otherwise read the file relative to `base_dir`.
fn resolve_text(inline: Option<String>, file: Option<&str>, base_dir: &Path) -> Result<Option<String>> {
    match (inline, file) {
        (Some(text), _) => Ok(Some(text)),
        (None, Some(file)) => {
            let path = base_dir.join(file);
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(Some(text))
        }
        (None, None) => Ok(None),
    }
}

/// Recursively load all `.toml` attempt set files from a directory.
pub fn load_attempt_directory(dir: &Path) -> Result<Vec<AttemptSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            sets.extend(load_attempt_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_attempt_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

/// Load a single file or every set under a directory.
pub fn load_attempt_sets(path: &Path) -> Result<Vec<AttemptSet>> {
    if path.is_dir() {
        load_attempt_directory(path)
    } else {
        Ok(vec![parse_attempt_set(path)?])
    }
}

/// A warning from attempt set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The attempt ID (if applicable).
    pub attempt_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate an attempt set for common issues.
pub fn validate_attempt_set(set: &AttemptSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if set.attempts.is_empty() {
        warnings.push(ValidationWarning {
            attempt_id: None,
            message: "attempt set has no attempts".into(),
        });
    }

    let mut seen_ids = std::collections::HashSet::new();
    for attempt in &set.attempts {
        if !seen_ids.insert(&attempt.id) {
            warnings.push(ValidationWarning {
                attempt_id: Some(attempt.id.clone()),
                message: format!("duplicate attempt ID: {}", attempt.id),
            });
        }
    }

    for attempt in &set.attempts {
        let warn = |message: String| ValidationWarning {
            attempt_id: Some(attempt.id.clone()),
            message,
        };

        match &attempt.reference {
            None => warnings.push(warn("no reference or reference_file provided".into())),
            // An empty reference grades any typed text as 100% precise.
            Some(text) if tokenize(text).is_empty() => warnings.push(warn(
                "reference has no words; any typed text will score 100% precision".into(),
            )),
            Some(_) => {}
        }

        if attempt.wpm.is_some() && attempt.elapsed_secs.is_some() {
            warnings.push(warn("both wpm and elapsed_secs given; elapsed_secs is ignored".into()));
        }

        if let Err(e) = attempt.resolve_wpm() {
            warnings.push(warn(e.to_string()));
        }

        if attempt.audio_id.trim().is_empty() {
            warnings.push(warn("audio_id is empty".into()));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[attempt_set]
id = "week-12"
name = "Week 12 tournament"
description = "Weekly tournament entries"

[[attempts]]
id = "ana"
audio_id = "audio-3"
reference = "o gato preto dormiu"
typed = "o gato dormiu"
wpm = 42.0
tags = ["tournament"]

[[attempts]]
id = "rui"
audio_id = "audio-3"
reference = "o gato preto dormiu"
typed = "o gato preto dormiu"
elapsed_secs = 6.0
"#;

    #[test]
    fn parse_valid_toml() {
        let set = parse_attempt_set_str(VALID_TOML, &PathBuf::from("week.toml")).unwrap();
        assert_eq!(set.id, "week-12");
        assert_eq!(set.name, "Week 12 tournament");
        assert_eq!(set.attempts.len(), 2);
        assert_eq!(set.attempts[0].wpm, Some(42.0));
        assert_eq!(set.attempts[0].tags, vec!["tournament"]);
        assert_eq!(set.attempts[1].elapsed_secs, Some(6.0));
        assert!(validate_attempt_set(&set).is_empty());
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[attempt_set]
id = "minimal"
name = "Minimal"

[[attempts]]
id = "a1"
"#;
        let set = parse_attempt_set_str(toml, &PathBuf::from("test.toml")).unwrap();
        let attempt = &set.attempts[0];
        assert!(attempt.reference.is_none());
        assert_eq!(attempt.typed, "");
        assert!(attempt.wpm.is_none());
        assert!(attempt.tags.is_empty());
    }

    #[test]
    fn transcripts_load_from_files_next_to_the_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ref.txt"), "um dois três").unwrap();
        std::fs::write(dir.path().join("typed.txt"), "um dois").unwrap();
        let toml = r#"
[attempt_set]
id = "files"
name = "Files"

[[attempts]]
id = "a1"
audio_id = "clip"
reference_file = "ref.txt"
typed_file = "typed.txt"
wpm = 10.0
"#;
        let path = dir.path().join("set.toml");
        std::fs::write(&path, toml).unwrap();

        let set = parse_attempt_set(&path).unwrap();
        assert_eq!(set.attempts[0].reference.as_deref(), Some("um dois três"));
        assert_eq!(set.attempts[0].typed, "um dois");
    }

    #[test]
    fn missing_transcript_file_is_an_error() {
        let toml = r#"
[attempt_set]
id = "broken"
name = "Broken"

[[attempts]]
id = "a1"
reference_file = "does-not-exist.txt"
"#;
        let err = parse_attempt_set_str(toml, &PathBuf::from("/nonexistent/set.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("a1"));
    }

    #[test]
    fn validate_duplicate_ids() {
        let toml = r#"
[attempt_set]
id = "dupes"
name = "Dupes"

[[attempts]]
id = "same"
audio_id = "clip"
reference = "sim"
wpm = 1.0

[[attempts]]
id = "same"
audio_id = "clip"
reference = "sim"
wpm = 1.0
"#;
        let set = parse_attempt_set_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_attempt_set(&set);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
    }

    #[test]
    fn validate_flags_empty_reference_and_missing_speed() {
        let toml = r#"
[attempt_set]
id = "gaps"
name = "Gaps"

[[attempts]]
id = "blank"
audio_id = "clip"
reference = "?!"
typed = "qualquer coisa"
"#;
        let set = parse_attempt_set_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_attempt_set(&set);
        assert!(warnings.iter().any(|w| w.message.contains("100% precision")));
        assert!(warnings.iter().any(|w| w.message.contains("needs either wpm")));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        let result = parse_attempt_set_str(bad, &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("bad.toml"), "not [toml").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sets = load_attempt_directory(dir.path()).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].id, "week-12");
    }
}
