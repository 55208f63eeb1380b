use crate::core::config::{NamingConfig, PredictorConfig};
use crate::tools::traits::{PredictionJob, Predictor};
use crate::LtrMetaError;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

const STDERR_TAIL_LINES: usize = 20;

/// Predictor driven through its command-line interface
pub struct CommandPredictor {
    program: String,
    args: Vec<String>,
    trna: Option<PathBuf>,
    hmm: Option<PathBuf>,
    folder_suffix: String,
}

impl CommandPredictor {
    pub fn new(config: &PredictorConfig, naming: &NamingConfig) -> Result<Self> {
        if config.program.trim().is_empty() {
            return Err(LtrMetaError::Config("Predictor program is not set".to_string()).into());
        }

        for (placeholder, value) in [("{trna}", &config.trna), ("{hmm}", &config.hmm)] {
            let used = config.args.iter().any(|a| a.contains(placeholder));
            match value {
                None if used => {
                    return Err(LtrMetaError::Config(format!(
                        "Predictor arguments use {} but no file is configured for it",
                        placeholder
                    ))
                    .into());
                }
                Some(path) if !path.exists() => {
                    return Err(LtrMetaError::Config(format!(
                        "Predictor reference {} does not exist",
                        path.display()
                    ))
                    .into());
                }
                _ => {}
            }
        }

        Ok(Self {
            program: config.program.clone(),
            args: config.args.clone(),
            trna: config.trna.clone(),
            hmm: config.hmm.clone(),
            folder_suffix: naming.result_folder_suffix.clone(),
        })
    }

    /// Substitute job values into the argument template
    pub fn render_args(&self, job: &PredictionJob<'_>) -> Vec<OsString> {
        let lossy = |p: &Path| p.to_string_lossy().to_string();
        let trna = self.trna.as_deref().map(lossy).unwrap_or_default();
        let hmm = self.hmm.as_deref().map(lossy).unwrap_or_default();

        self.args
            .iter()
            .map(|arg| {
                OsString::from(
                    arg.replace("{genome}", &lossy(job.genome))
                        .replace("{name}", job.name)
                        .replace("{output}", &lossy(job.work_dir))
                        .replace("{trna}", &trna)
                        .replace("{hmm}", &hmm),
                )
            })
            .collect()
    }

    fn resolve_program(&self) -> Result<PathBuf> {
        let candidate = Path::new(&self.program);
        if candidate.components().count() > 1 {
            if candidate.exists() {
                return Ok(candidate.to_path_buf());
            }
            anyhow::bail!(LtrMetaError::Predictor(format!(
                "Predictor binary not found at {}",
                candidate.display()
            )));
        }

        which::which(&self.program).map_err(|_| {
            let message = format!("Predictor '{}' not found in PATH", self.program);
            LtrMetaError::Predictor(message).into()
        })
    }
}

impl Predictor for CommandPredictor {
    fn predict(&mut self, job: &PredictionJob<'_>) -> Result<PathBuf> {
        let program = self.resolve_program()?;

        let mut cmd = Command::new(&program);
        cmd.args(self.render_args(job)).current_dir(job.work_dir);

        tracing::info!("Running {} on {}", self.program, job.genome.display());
        tracing::debug!("Executing: {:?}", cmd);

        let output = cmd
            .output()
            .with_context(|| format!("Failed to start {}", program.display()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stdout.lines() {
            tracing::debug!("{} [stdout]: {}", self.program, line);
        }
        for line in stderr.lines() {
            tracing::debug!("{} [stderr]: {}", self.program, line);
        }

        if !output.status.success() {
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
            anyhow::bail!(LtrMetaError::Predictor(format!(
                "{} failed on {} with exit code {:?}\n{}",
                self.program,
                job.genome.display(),
                output.status.code(),
                tail
            )));
        }

        let folder = job.work_dir.join(format!("{}{}", job.name, self.folder_suffix));
        if !folder.is_dir() {
            anyhow::bail!(LtrMetaError::Predictor(format!(
                "{} finished but did not create {}",
                self.program,
                folder.display()
            )));
        }

        Ok(folder)
    }

    fn verify_installation(&self) -> Result<()> {
        self.resolve_program().map(|_| ())
    }

    fn name(&self) -> &str {
        &self.program
    }
}
