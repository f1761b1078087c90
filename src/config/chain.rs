//! Inheritance chains derived from underscore-delimited config file names.
//!
//! `exp_unet_large.yaml` inherits from `exp_unet.yaml`; the more specific
//! file wins on every colliding key.

use super::loader::load_config;
use super::merge::chain_maps;
use crate::domain::{ConfigTree, ConfigValue};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Candidate layer files for one config path, most general first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritanceChain {
    segments: Vec<String>,
    candidates: Vec<PathBuf>,
}

impl InheritanceChain {
    /// Derive the chain for `path`.
    ///
    /// Candidates are the cumulative prefixes `s0_s1`, `s0_s1_s2`, ... of the
    /// file stem, re-using the original directory and extension. The first
    /// segment alone is never a candidate.
    pub fn from_path(path: &Path) -> Self {
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let segments: Vec<String> = stem.split('_').map(str::to_string).collect();
        let candidates = (2..=segments.len())
            .map(|n| dir.join(format!("{}{}", segments[..n].join("_"), ext)))
            .collect();

        Self { segments, candidates }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Synthetic lowest-priority layer: `tag` is the second segment and
    /// `suffix` joins the rest. `None` for single-segment names.
    pub fn synthetic_layer(&self) -> Option<ConfigTree> {
        let tag = self.segments.get(1)?;
        let mut layer = ConfigTree::new();
        layer.insert("tag".to_string(), ConfigValue::str(tag.clone()));
        layer.insert("suffix".to_string(), ConfigValue::str(self.segments[2..].join("_")));
        Some(layer)
    }
}

/// Resolve `base_path` into one merged config tree.
///
/// With `inherit` off the file is loaded as-is. With it on, every existing
/// candidate of the [`InheritanceChain`] becomes a layer and the most specific
/// layer wins per key; `tag`/`suffix` are injected below all real layers.
pub fn resolve_chain(base_path: &Path, inherit: bool) -> Result<ConfigTree> {
    if !inherit {
        tracing::debug!("Inheritance disabled; loading {} directly", base_path.display());
        return load_config(base_path);
    }

    let chain = InheritanceChain::from_path(base_path);
    let Some(synthetic) = chain.synthetic_layer() else {
        // A single segment has no ancestors.
        return load_config(base_path);
    };

    let mut layers = Vec::new();
    for candidate in chain.candidates() {
        if candidate.is_file() {
            tracing::debug!("Loading config layer {}", candidate.display());
            layers.push(load_config(candidate)?);
        } else {
            tracing::debug!("Skipping missing config layer {}", candidate.display());
        }
    }
    if layers.is_empty() {
        tracing::warn!("No config layers found for {}", base_path.display());
    }

    let mut ordered: Vec<&ConfigTree> = layers.iter().rev().collect();
    ordered.push(&synthetic);
    let resolved = chain_maps(&ordered)?;

    tracing::info!(
        "Resolved {} from {} layer(s) ({} top-level keys)",
        base_path.display(),
        layers.len(),
        resolved.len()
    );
    Ok(resolved)
}
