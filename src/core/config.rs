use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub predictor: PredictorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Minimum LTR similarity (percent, inclusive)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Width of each similarity bin (percent)
    #[serde(default = "default_bin_width")]
    pub bin_width: f64,
    #[serde(default = "default_quality_filter")]
    pub quality_filter: bool,
    #[serde(default = "default_min_orfs")]
    pub min_orfs: u32,
    /// Largest tolerated share of N bases inside an element
    #[serde(default = "default_max_unknown_fraction")]
    pub max_unknown_fraction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Marker appended to the genome basename on result folders
    #[serde(default = "default_result_folder_suffix")]
    pub result_folder_suffix: String,
    /// File name ending of the data sheet inside a result folder
    #[serde(default = "default_datasheet_suffix")]
    pub datasheet_suffix: String,
    /// Extensions recognised as genome files (without the leading dot, `.gz` implied)
    #[serde(default = "default_genome_extensions")]
    pub genome_extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    #[serde(default = "default_program")]
    pub program: String,
    /// Argument template; `{genome}`, `{name}`, `{output}`, `{trna}` and `{hmm}` are substituted
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// tRNA reference used for PBS detection
    #[serde(default)]
    pub trna: Option<PathBuf>,
    /// HMM library used for protein domain annotation
    #[serde(default)]
    pub hmm: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
    #[serde(default)]
    pub prefix: Option<String>,
}

fn default_similarity_threshold() -> f64 {
    70.0
}

fn default_bin_width() -> f64 {
    2.0
}

fn default_quality_filter() -> bool {
    true
}

fn default_min_orfs() -> u32 {
    1
}

fn default_max_unknown_fraction() -> f64 {
    0.1
}

fn default_result_folder_suffix() -> String {
    "_ltrpred".to_string()
}

fn default_datasheet_suffix() -> String {
    "_LTRpred_DataSheet.tsv".to_string()
}

fn default_genome_extensions() -> Vec<String> {
    ["fa", "fasta", "fna", "fas", "fsa", "faa", "seq"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_program() -> String {
    "LTRpred".to_string()
}

fn default_args() -> Vec<String> {
    ["--genome", "{genome}", "--output", "{output}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            bin_width: default_bin_width(),
            quality_filter: default_quality_filter(),
            min_orfs: default_min_orfs(),
            max_unknown_fraction: default_max_unknown_fraction(),
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            result_folder_suffix: default_result_folder_suffix(),
            datasheet_suffix: default_datasheet_suffix(),
            genome_extensions: default_genome_extensions(),
        }
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            trna: None,
            hmm: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            prefix: None,
        }
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, crate::LtrMetaError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        crate::LtrMetaError::Config(format!("Cannot read config {}: {}", path.display(), e))
    })?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| crate::LtrMetaError::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), crate::LtrMetaError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| crate::LtrMetaError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = default_config();
        assert_eq!(config.filter.similarity_threshold, 70.0);
        assert_eq!(config.filter.bin_width, 2.0);
        assert!(config.filter.quality_filter);
        assert_eq!(config.filter.min_orfs, 1);
        assert_eq!(config.filter.max_unknown_fraction, 0.1);
        assert_eq!(config.naming.result_folder_suffix, "_ltrpred");
        assert!(config.predictor.trna.is_none());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [filter]
            similarity_threshold = 80.0
            quality_filter = false
            "#,
        )
        .unwrap();

        assert_eq!(config.filter.similarity_threshold, 80.0);
        assert!(!config.filter.quality_filter);
        assert_eq!(config.filter.bin_width, 2.0);
        assert_eq!(config.naming.datasheet_suffix, "_LTRpred_DataSheet.tsv");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ltrmeta.toml");

        let mut config = default_config();
        config.filter.bin_width = 5.0;
        config.output.prefix = Some("plants".to_string());
        save_config(&path, &config).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.filter.bin_width, 5.0);
        assert_eq!(loaded.output.prefix.as_deref(), Some("plants"));
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[filter\nbin_width = ").unwrap();

        assert!(matches!(
            load_config(&path),
            Err(crate::LtrMetaError::Config(_))
        ));
    }
}
