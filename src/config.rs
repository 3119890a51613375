use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Classifier configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyConfig {
    /// Extra sequential type markers on top of the built-in set, for
    /// vendor cell libraries that spell their flops their own way.
    #[serde(default)]
    pub extra_markers: Vec<String>,
}

/// Analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Analyze modules on the rayon pool by default.
    #[serde(default)]
    pub parallel: bool,
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format used when --format is not given.
    pub default_format: Option<String>,
}

/// Top-level configuration, read from `.sigcone.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigconeConfig {
    #[serde(default)]
    pub classify: ClassifyConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Cache the configuration
static CONFIG: OnceLock<SigconeConfig> = OnceLock::new();

/// Pure function to read config file contents
fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse config from TOML string
fn parse_config(contents: &str) -> Result<SigconeConfig, String> {
    toml::from_str::<SigconeConfig>(contents)
        .map_err(|e| format!("Failed to parse .sigcone.toml: {e}"))
}

fn try_load_config_from_path(path: &Path) -> Option<SigconeConfig> {
    match read_config_file(path) {
        Ok(contents) => match parse_config(&contents) {
            Ok(config) => {
                log::debug!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                log::warn!("{e}");
                None
            }
        },
        Err(error) => {
            // "Not found" just means keep walking up.
            if error.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to read config file {}: {}", path.display(), error);
            }
            None
        }
    }
}

/// Directory ancestors up to a depth limit, innermost first
fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Load configuration from the nearest `.sigcone.toml`, if any.
pub fn load_config() -> SigconeConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("Failed to get current directory: {e}. Using default config.");
            return SigconeConfig::default();
        }
    };

    directory_ancestors(current, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(".sigcone.toml"))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {MAX_TRAVERSAL_DEPTH} directories. Using default config."
            );
            SigconeConfig::default()
        })
}

/// Get the cached configuration
pub fn get_config() -> &'static SigconeConfig {
    CONFIG.get_or_init(load_config)
}

/// Extra sequential markers from configuration.
pub fn extra_markers() -> &'static [String] {
    &get_config().classify.extra_markers
}

/// Configured default report format, if any.
pub fn default_format() -> Option<&'static str> {
    get_config().output.default_format.as_deref()
}

/// Whether batch runs default to the rayon pool.
pub fn parallel_default() -> bool {
    get_config().analysis.parallel
}
