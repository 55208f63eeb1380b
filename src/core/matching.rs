//! Pairing genome files with predictor result folders
//!
//! Two ways are supported: matching by name (genome basename plus the
//! result folder marker) and an explicit manifest.

use crate::core::config::NamingConfig;
use crate::LtrMetaError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A genome file and the name used for it in every output table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeEntry {
    pub organism: String,
    pub path: PathBuf,
}

/// A genome paired with the folder holding its predictions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedGenome {
    pub genome: GenomeEntry,
    pub result_folder: PathBuf,
}

/// Strip `.gz` and then one known sequence extension from a file name
pub fn genome_basename(file_name: &str, extensions: &[String]) -> Option<String> {
    let name = file_name.strip_suffix(".gz").unwrap_or(file_name);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    extensions
        .iter()
        .any(|e| e.eq_ignore_ascii_case(ext))
        .then(|| stem.to_string())
}

/// List genome files in name order
pub fn list_genomes(
    genome_dir: &Path,
    naming: &NamingConfig,
) -> Result<Vec<GenomeEntry>, LtrMetaError> {
    if !genome_dir.is_dir() {
        return Err(LtrMetaError::Config(format!(
            "Genome directory {} does not exist",
            genome_dir.display()
        )));
    }

    let mut genomes = Vec::new();
    for entry in fs::read_dir(genome_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name.starts_with('.') {
            continue;
        }
        match genome_basename(&file_name, &naming.genome_extensions) {
            Some(organism) => genomes.push(GenomeEntry {
                organism,
                path: entry.path(),
            }),
            None => tracing::debug!("Ignoring non-genome file {}", file_name),
        }
    }

    genomes.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

    // Organism names key result folders and output rows, so they must be unique
    let mut seen: HashMap<&str, &Path> = HashMap::new();
    for genome in &genomes {
        if let Some(first) = seen.insert(genome.organism.as_str(), genome.path.as_path()) {
            return Err(LtrMetaError::DataConsistency(format!(
                "Genome files {} and {} both map to organism '{}'",
                first.display(),
                genome.path.display(),
                genome.organism
            )));
        }
    }

    Ok(genomes)
}

/// Pair every genome with `<basename><suffix>` inside `results_dir`
///
/// Fails before anything is read when the number of matched folders differs
/// from the number of genomes.
pub fn match_result_folders(
    genomes: &[GenomeEntry],
    results_dir: &Path,
    naming: &NamingConfig,
) -> Result<Vec<MatchedGenome>, LtrMetaError> {
    if !results_dir.is_dir() {
        return Err(LtrMetaError::Config(format!(
            "Results directory {} does not exist",
            results_dir.display()
        )));
    }

    let mut folders: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(results_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(base) = name.strip_suffix(naming.result_folder_suffix.as_str()) {
            folders.push((base.to_string(), entry.path()));
        }
    }

    let matched: Vec<MatchedGenome> = genomes
        .iter()
        .filter_map(|genome| {
            folders
                .iter()
                .find(|(base, _)| *base == genome.organism)
                .map(|(_, folder)| MatchedGenome {
                    genome: genome.clone(),
                    result_folder: folder.clone(),
                })
        })
        .collect();

    if matched.len() != genomes.len() {
        let missing: Vec<&str> = genomes
            .iter()
            .filter(|g| !matched.iter().any(|m| m.genome.organism == g.organism))
            .map(|g| g.organism.as_str())
            .collect();
        return Err(LtrMetaError::DataConsistency(format!(
            "Found {} genome files but {} matching result folders in {} (unmatched: {})",
            genomes.len(),
            matched.len(),
            results_dir.display(),
            missing.join(", ")
        )));
    }

    Ok(matched)
}

/// Locate the data sheet inside a result folder
pub fn find_datasheet(
    folder: &Path,
    naming: &NamingConfig,
) -> Result<Option<PathBuf>, LtrMetaError> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .ends_with(naming.datasheet_suffix.as_str())
        })
        .map(|entry| entry.path())
        .collect();

    candidates.sort();
    if candidates.len() > 1 {
        tracing::warn!(
            "Several data sheets in {}, using {}",
            folder.display(),
            candidates[0].display()
        );
    }
    Ok(candidates.into_iter().next())
}

/// Explicit organism → genome → result folder mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "genome", default)]
    pub genomes: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Defaults to the genome file basename
    #[serde(default)]
    pub organism: Option<String>,
    pub genome: PathBuf,
    pub results: PathBuf,
}

impl Manifest {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LtrMetaError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            LtrMetaError::Config(format!("Cannot read manifest {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents).map_err(|e| {
            LtrMetaError::Config(format!(
                "Failed to parse manifest {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Resolve entries against the genome directory and the manifest location
    ///
    /// Relative genome paths are taken from `genome_dir`, relative result
    /// folders from the directory holding the manifest.
    pub fn resolve(
        &self,
        genome_dir: &Path,
        manifest_dir: &Path,
        naming: &NamingConfig,
    ) -> Result<Vec<MatchedGenome>, LtrMetaError> {
        if !genome_dir.is_dir() {
            return Err(LtrMetaError::Config(format!(
                "Genome directory {} does not exist",
                genome_dir.display()
            )));
        }

        let mut matched = Vec::with_capacity(self.genomes.len());
        for entry in &self.genomes {
            let genome_path = if entry.genome.is_absolute() {
                entry.genome.clone()
            } else {
                genome_dir.join(&entry.genome)
            };
            if !genome_path.is_file() {
                return Err(LtrMetaError::DataConsistency(format!(
                    "Manifest genome {} does not exist",
                    genome_path.display()
                )));
            }

            let organism = match &entry.organism {
                Some(name) => name.clone(),
                None => {
                    let file_name = genome_path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    genome_basename(&file_name, &naming.genome_extensions).unwrap_or(file_name)
                }
            };

            let result_folder = if entry.results.is_absolute() {
                entry.results.clone()
            } else {
                manifest_dir.join(&entry.results)
            };
            if !result_folder.is_dir() {
                return Err(LtrMetaError::DataConsistency(format!(
                    "Manifest result folder {} for {} does not exist",
                    result_folder.display(),
                    organism
                )));
            }
            if matched.iter().any(|m: &MatchedGenome| m.genome.organism == organism) {
                return Err(LtrMetaError::DataConsistency(format!(
                    "Manifest lists organism '{}' more than once",
                    organism
                )));
            }

            matched.push(MatchedGenome {
                genome: GenomeEntry {
                    organism,
                    path: genome_path,
                },
                result_folder,
            });
        }

        Ok(matched)
    }
}
