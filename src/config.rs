//! User configuration (`config.toml`).

use directories::ProjectDirs;
use hisab_core::GridSize;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB
const MAX_ROWS: usize = 1_000;
const MAX_COLS: usize = 26;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    grid: Option<GridSection>,
    share: Option<ShareSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    rows: Option<usize>,
    cols: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShareSection {
    dir: Option<PathBuf>,
}

/// Effective configuration after defaults are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub grid: GridSize,
    pub share_dir: Option<PathBuf>,
}

/// Load configuration from `config_file`, or from the user config dir when
/// none is given. Problems are reported as warnings and the affected
/// settings fall back to their defaults.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let file = match read_config_file(&path) {
        Ok(file) => file,
        Err(warning) => {
            warnings.push(warning);
            return (Config::default(), warnings);
        }
    };

    let config = build_config(file, &mut warnings);
    (config, warnings)
}

fn read_config_file(path: &Path) -> Result<ConfigFile, String> {
    let meta = std::fs::metadata(path)
        .map_err(|err| format!("Failed to read metadata for {}: {}", path.display(), err))?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(format!(
            "Refusing to read {}: file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        ));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {}", path.display(), err))?;
    parse_config(&content).map_err(|err| format!("Failed to parse {}: {}", path.display(), err))
}

fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str::<ConfigFile>(content)
}

fn build_config(file: ConfigFile, warnings: &mut Vec<String>) -> Config {
    let defaults = GridSize::default();
    let grid = file.grid.as_ref();
    let rows = checked_dimension(
        "grid.rows",
        grid.and_then(|g| g.rows),
        defaults.rows,
        MAX_ROWS,
        warnings,
    );
    let cols = checked_dimension(
        "grid.cols",
        grid.and_then(|g| g.cols),
        defaults.cols,
        MAX_COLS,
        warnings,
    );

    Config {
        grid: GridSize::new(rows, cols),
        share_dir: file.share.and_then(|s| s.dir),
    }
}

fn checked_dimension(
    name: &str,
    value: Option<usize>,
    default: usize,
    max: usize,
    warnings: &mut Vec<String>,
) -> usize {
    match value {
        None => default,
        Some(v) if (1..=max).contains(&v) => v,
        Some(v) => {
            warnings.push(format!(
                "{} = {} is out of range (1..={}); using {}",
                name, v, max, default
            ));
            default
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "hisab")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
