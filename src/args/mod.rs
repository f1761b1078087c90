//! Bridge between command-line flags and config trees
//!
//! Declares the base flags, overlays a resolved config file as extra dotted
//! flags, parses the command line and rebuilds a nested, read-only tree.

pub mod base;
pub mod namespace;
pub mod overlay;
pub mod parse;
pub mod schema;

pub use base::declare_base_arguments;
pub use namespace::{flatten, namespace_to_tree, ArgumentNamespace, FinalConfig};
pub use overlay::overlay_config_as_arguments;
pub use parse::parse;
pub use schema::{ArgKind, ArgSpec, ArgumentSchema};

use crate::config::resolve_chain;
use crate::error::{ConfigError, Result};
use std::path::PathBuf;

/// The few flags that steer resolution itself, read before the full parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionRequest {
    pub exp_config: String,
    pub inherit_off: bool,
    pub debug_on: bool,
}

/// Scan raw tokens for `--exp_config`, `--inherit_off` and `--debug_on`.
///
/// The last `--exp_config` wins; scanning stops at a bare `--`.
pub fn prescan<T: AsRef<str>>(tokens: &[T]) -> ResolutionRequest {
    let mut request = ResolutionRequest::default();
    let mut iter = tokens.iter().map(|t| t.as_ref());
    while let Some(token) = iter.next() {
        match token {
            "--" => break,
            "--exp_config" => {
                if let Some(value) = iter.next() {
                    request.exp_config = value.to_string();
                }
            }
            "--inherit_off" => request.inherit_off = true,
            "--debug_on" => request.debug_on = true,
            other => {
                if let Some(value) = other.strip_prefix("--exp_config=") {
                    request.exp_config = value.to_string();
                }
            }
        }
    }
    request
}

/// Resolve the full configuration for one invocation.
///
/// `tokens` excludes the program name.
pub fn parse_args<I, T>(tokens: I) -> Result<FinalConfig>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    parse_args_with(tokens, |schema| schema)
}

/// Like [`parse_args`], letting `configurator` extend the base schema first.
pub fn parse_args_with<I, T, F>(tokens: I, configurator: F) -> Result<FinalConfig>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
    F: FnOnce(ArgumentSchema) -> ArgumentSchema,
{
    let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
    let mut schema = configurator(declare_base_arguments());
    let request = prescan(tokens.as_slice());

    if !request.exp_config.is_empty() {
        let path = PathBuf::from(&request.exp_config);
        if !path.exists() {
            return Err(ConfigError::ConfigFileNotFound { path });
        }
        tracing::info!("Reading experiment config {}", path.display());
        let resolved = resolve_chain(&path, !request.inherit_off)?;
        schema = overlay_config_as_arguments(schema, &resolved)?;
    }

    let namespace = parse(&schema, tokens.as_slice())?;
    namespace_to_tree(&namespace)
}
