use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::data::loader::LoadOptions;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RUST_EDA_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "rusty-eda.json";

/// Viewer settings. Every field has a default, so a config file only needs
/// the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Rows shown in the dataset preview.
    pub preview_rows: usize,
    /// Field delimiter for `.csv` / `.txt` files.
    pub delimiter: char,
    /// Number of points on the KDE curve.
    pub kde_points: usize,
    /// Print coefficients inside heatmap cells.
    pub annotate_heatmap: bool,
    pub window_size: [f32; 2],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            delimiter: ',',
            kde_points: 200,
            annotate_heatmap: true,
            window_size: [1280.0, 900.0],
        }
    }
}

impl ViewerConfig {
    /// Resolve and load the config: `$RUST_EDA_CONFIG`, then
    /// `./rusty-eda.json`, then defaults. A broken file is logged and ignored.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                p.exists().then_some(p)
            });

        let Some(path) = path else {
            return Self::default();
        };
        match Self::from_path(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).context("reading config file")?;
        let config: Self = serde_json::from_str(&text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\n' | '\r') {
            bail!("delimiter must be a single ASCII character other than quote, CR or LF");
        }
        if self.kde_points < 2 {
            bail!("kde_points must be at least 2");
        }
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            delimiter: self.delimiter as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ViewerConfig = serde_json::from_str(r#"{"preview_rows": 10}"#).unwrap();
        assert_eq!(config.preview_rows, 10);
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.kde_points, 200);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ViewerConfig::default();
        config.delimiter = 'é';
        assert!(config.validate().is_err());

        for bad in ['"', '\n', '\r'] {
            let config = ViewerConfig {
                delimiter: bad,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{bad:?} accepted");
        }

        let mut config = ViewerConfig::default();
        config.kde_points = 1;
        assert!(config.validate().is_err());

        assert!(ViewerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_options_use_delimiter() {
        let config = ViewerConfig {
            delimiter: ';',
            ..Default::default()
        };
        assert_eq!(config.load_options().delimiter, b';');
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let err = ViewerConfig::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{err:#}").contains("reading config file"));
    }
}
