//! expcfg: layered experiment configuration for training/evaluation runs
//!
//! Resolves an inheritance family of config files (`exp_unet_large.yaml`
//! inherits from `exp_unet.yaml`), exposes every config leaf as a dotted
//! command-line flag, and hands back one read-only config tree.

pub mod args;
pub mod config;
pub mod domain;
pub mod error;

pub use args::{parse_args, parse_args_with, FinalConfig};
pub use domain::{ConfigTree, ConfigValue, Scalar, ScalarKind};
pub use error::{ConfigError, Result};
