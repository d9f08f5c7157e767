use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Root configuration structure, deserialized from `.artifact-analyzer/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub download: DownloadConfig,
    pub report: ReportConfig,
}

/// Directory-walk settings shared by every scanning command.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Path substrings pruned from every walk, e.g. `"/target/"`.
    pub skip_paths: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            skip_paths: vec!["/target/".to_string()],
        }
    }
}

/// CI log download settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Used when `--url-template` is not given; `{job}` is replaced by the job name.
    pub url_template: Option<String>,
    pub timeout_secs: u64,
    /// Jobs fetched at once.
    pub concurrency: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            url_template: None,
            timeout_secs: 30,
            concurrency: 8,
        }
    }
}

impl DownloadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// `analyze` flags keys carrying at least this many distinct versions.
    pub min_versions: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { min_versions: 2 }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<working_dir>/.artifact-analyzer/config.toml`
/// 3. `~/.config/artifact-analyzer/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(working_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read(path);
    }

    let local = working_dir.join(".artifact-analyzer").join("config.toml");
    if local.exists() {
        return read(&local);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("artifact-analyzer")
            .join("config.toml");
        if home_config.exists() {
            return read(&home_config);
        }
    }

    Ok(Config::default())
}

fn read(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.scan.skip_paths, vec!["/target/"]);
        assert_eq!(cfg.download.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.download.concurrency, 8);
        assert_eq!(cfg.report.min_versions, 2);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[scan]
skip_paths = ["/target/", "/.git/"]

[download]
url_template = "https://ci.example.org/job/{job}/consoleText"
"#,
        )
        .unwrap();
        assert_eq!(cfg.scan.skip_paths.len(), 2);
        assert_eq!(
            cfg.download.url_template.as_deref(),
            Some("https://ci.example.org/job/{job}/consoleText")
        );
        assert_eq!(cfg.download.concurrency, 8);
        assert_eq!(cfg.report.min_versions, 2);
    }

    #[test]
    fn test_discovers_working_dir_config() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".artifact-analyzer");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "[report]\nmin_versions = 3\n").unwrap();

        let cfg = load_config(tmp.path(), None).unwrap();
        assert_eq!(cfg.report.min_versions, 3);
    }

    #[test]
    fn test_override_wins_and_errors_surface() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        std::fs::write(&path, "[scan]\nskip_paths = []\n").unwrap();
        assert!(load_config(tmp.path(), Some(&path)).unwrap().scan.skip_paths.is_empty());

        std::fs::write(&path, "[scan\nbroken").unwrap();
        assert!(load_config(tmp.path(), Some(&path)).is_err());
    }
}
