use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::foundation::error::{ValidatorError, ValidatorResult};
use crate::report::builder::{ValidationReport, build_report};
use crate::rules::assets::{AssetResolver, FsAssetResolver};
use crate::rules::config::RuleConfig;
use crate::rules::engine::RuleEngine;
use crate::scene::parser::parse_scene;

#[derive(Clone, Copy, Debug, Default)]
/// How a batch of scene files is validated.
pub struct BatchThreading {
    /// Validate files concurrently on a dedicated thread pool.
    pub parallel: bool,
    /// Worker thread override (parallel mode only). `None` uses rayon defaults.
    pub threads: Option<usize>,
}

/// Parse → evaluate → report pipeline over a fixed rule configuration.
///
/// Runs share nothing mutable: the configuration and asset resolver are read-only, and each
/// run owns its graph, so distinct files can be validated in parallel.
pub struct SceneValidator {
    config: RuleConfig,
    assets: Box<dyn AssetResolver>,
}

impl SceneValidator {
    /// Validator resolving assets on disk relative to `config.asset_root`.
    pub fn new(config: RuleConfig) -> Self {
        let assets = FsAssetResolver::new(config.asset_root.clone());
        Self::with_assets(config, assets)
    }

    /// Validator with a custom asset resolver.
    pub fn with_assets(config: RuleConfig, assets: impl AssetResolver + 'static) -> Self {
        Self {
            config,
            assets: Box::new(assets),
        }
    }

    /// Load the rule configuration from a JSON file.
    pub fn from_config_path(path: &Path) -> ValidatorResult<Self> {
        Ok(Self::new(RuleConfig::from_path(path)?))
    }

    /// Active configuration.
    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Validate scene text. `source` labels the report.
    ///
    /// Fails only when the scene cannot be parsed; rule violations are findings.
    #[tracing::instrument(skip(self, text))]
    pub fn validate_str(&self, source: &str, text: &str) -> ValidatorResult<ValidationReport> {
        let parsed = parse_scene(text)?;
        if !parsed.warnings.is_empty() {
            tracing::warn!(
                count = parsed.warnings.len(),
                "scene contains statements that were skipped"
            );
        }
        let findings = RuleEngine::new(&self.config, self.assets.as_ref()).evaluate(&parsed.graph);
        let report = build_report(source, findings, parsed.warnings);
        tracing::info!(
            passed = report.passed(),
            errors = report.counts().errors,
            warnings = report.counts().warnings,
            "validation finished"
        );
        Ok(report)
    }

    /// Read and validate a scene file.
    pub fn validate_path(&self, path: &Path) -> ValidatorResult<ValidationReport> {
        let text = std::fs::read_to_string(path).map_err(|e| ValidatorError::io(path, e))?;
        self.validate_str(&path.display().to_string(), &text)
    }

    /// Validate several files. Results are returned in input order; a file that cannot be
    /// validated does not stop the others.
    pub fn validate_batch(
        &self,
        paths: &[PathBuf],
        threading: BatchThreading,
    ) -> ValidatorResult<Vec<ValidatorResult<ValidationReport>>> {
        if !threading.parallel {
            return Ok(paths.iter().map(|p| self.validate_path(p)).collect());
        }
        let pool = build_thread_pool(threading.threads)?;
        Ok(pool.install(|| paths.par_iter().map(|p| self.validate_path(p)).collect()))
    }
}

fn build_thread_pool(threads: Option<usize>) -> ValidatorResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ValidatorError::config(
            "batch threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ValidatorError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/validator.rs"]
mod tests;
