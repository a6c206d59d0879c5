use crate::lede::DEFAULT_DELIMITER;
use crate::pipeline::Settings;
use crate::task::Task;
use crate::{MpedsError, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default)]
pub struct MpedsConfig {
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub lede: LedeConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

#[derive(Debug, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_artifact_dir")]
    pub dir: PathBuf,
    /// Task name (`relevance`/`haystack`, `form`, `issue`, `target`) to artifact version.
    #[serde(default)]
    pub versions: HashMap<String, String>,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: default_artifact_dir(),
            versions: HashMap::new(),
        }
    }
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("classifiers")
}

#[derive(Debug, Deserialize)]
pub struct LedeConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for LedeConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.into()
}

#[derive(Debug, Deserialize, Default)]
pub struct ProcessingConfig {
    /// Run per-document work on the rayon pool.
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Debug, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "default_true")]
    pub verbose: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { verbose: true }
    }
}

fn default_true() -> bool {
    true
}

/// Load config from an explicit path, MPEDS_CONFIG, ~/.mpeds/config.toml, or defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<MpedsConfig> {
    let path = explicit.map(Path::to_path_buf).or_else(config_path);
    match path {
        Some(p) if explicit.is_some() || p.exists() => {
            let content = std::fs::read_to_string(&p)?;
            let config: MpedsConfig = toml::from_str(&content)
                .map_err(|e| MpedsError::Config(format!("{}: {e}", p.display())))?;
            validate_config(&config)?;
            Ok(config)
        }
        _ => Ok(MpedsConfig::default()),
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("MPEDS_CONFIG") {
        return Some(PathBuf::from(p));
    }
    let home = std::env::var("HOME").ok()?;
    Some(Path::new(&home).join(".mpeds").join("config.toml"))
}

fn validate_config(config: &MpedsConfig) -> Result<()> {
    if config.lede.delimiter.is_empty() {
        return Err(MpedsError::Config("lede.delimiter must not be empty".into()));
    }
    parse_versions(&config.artifacts.versions)?;
    Ok(())
}

fn parse_versions(raw: &HashMap<String, String>) -> Result<HashMap<Task, String>> {
    let mut versions = HashMap::new();
    for (name, version) in raw {
        let task = Task::from_str(name, true)
            .map_err(|_| MpedsError::Config(format!("artifacts.versions: unknown task {name:?}")))?;
        if version.trim().is_empty() {
            return Err(MpedsError::Config(format!("artifacts.versions.{name} is empty")));
        }
        versions.insert(task, version.clone());
    }
    Ok(versions)
}

/// Merge the config file with CLI overrides into runtime settings.
pub fn resolve_settings(config: &MpedsConfig, artifact_dir: Option<PathBuf>) -> Result<Settings> {
    Ok(Settings {
        artifact_dir: artifact_dir.unwrap_or_else(|| config.artifacts.dir.clone()),
        versions: parse_versions(&config.artifacts.versions)?,
        delimiter: config.lede.delimiter.clone(),
        parallel: config.processing.parallel,
        verbose: config.extract.verbose,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_when_no_file() {
        let config = MpedsConfig::default();
        assert_eq!(config.artifacts.dir, PathBuf::from("classifiers"));
        assert!(config.artifacts.versions.is_empty());
        assert_eq!(config.lede.delimiter, "<br/>");
        assert!(!config.processing.parallel);
        assert!(config.extract.verbose);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[artifacts]
dir = "/srv/mpeds/classifiers"

[artifacts.versions]
haystack = "all-source_2018-01-02"
target = "2018-02-01"

[lede]
delimiter = "\n\n"

[processing]
parallel = true

[extract]
verbose = false
"#;
        let config: MpedsConfig = toml::from_str(toml_str).unwrap();
        validate_config(&config).unwrap();
        let settings = resolve_settings(&config, None).unwrap();
        assert_eq!(settings.artifact_dir, PathBuf::from("/srv/mpeds/classifiers"));
        assert_eq!(settings.versions[&Task::Relevance], "all-source_2018-01-02");
        assert_eq!(settings.versions[&Task::Target], "2018-02-01");
        assert!(!settings.versions.contains_key(&Task::Form));
        assert_eq!(settings.delimiter, "\n\n");
        assert!(settings.parallel);
        assert!(!settings.verbose);
    }

    #[test]
    fn cli_artifact_dir_overrides_file() {
        let config = MpedsConfig::default();
        let settings = resolve_settings(&config, Some(PathBuf::from("/tmp/models"))).unwrap();
        assert_eq!(settings.artifact_dir, PathBuf::from("/tmp/models"));
    }

    #[test]
    fn empty_delimiter_rejected() {
        let config: MpedsConfig = toml::from_str("[lede]\ndelimiter = \"\"\n").unwrap();
        assert!(matches!(validate_config(&config), Err(MpedsError::Config(_))));
    }

    #[test]
    fn unknown_task_version_rejected() {
        let config: MpedsConfig = toml::from_str("[artifacts.versions]\nsentiment = \"v1\"\n").unwrap();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("sentiment"));
    }

    #[test]
    fn load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[processing]\nparallel = true\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert!(config.processing.parallel);
    }

    #[test]
    fn load_config_explicit_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
