//! Strict command-line parsing against an [`ArgumentSchema`].

use super::namespace::ArgumentNamespace;
use super::schema::{ArgKind, ArgSpec, ArgumentSchema, COMMAND_ID};
use crate::domain::{ConfigValue, Scalar, ScalarKind};
use crate::error::{ConfigError, Result};
use clap::error::{ContextKind, ErrorKind};
use clap::parser::ValueSource;
use clap::ArgMatches;

/// Parse `tokens` (without the program name) into a flat namespace.
///
/// Every declared flag lands in the namespace, either with the supplied value
/// or with its default. Tokens no flag consumes are an
/// [`ConfigError::UnrecognizedArgument`].
pub fn parse<T: AsRef<str>>(schema: &ArgumentSchema, tokens: &[T]) -> Result<ArgumentNamespace> {
    let matches = schema
        .to_command()
        .try_get_matches_from(tokens.iter().map(|t| t.as_ref()))
        .map_err(|e| match e.kind() {
            ErrorKind::UnknownArgument => {
                let token = e
                    .get(ContextKind::InvalidArg)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| e.to_string());
                ConfigError::UnrecognizedArgument(token)
            }
            _ => ConfigError::Cli(e),
        })?;

    let mut namespace = ArgumentNamespace::new();
    if let Some(cmd) = matches.get_one::<String>(COMMAND_ID) {
        namespace.insert(COMMAND_ID, ConfigValue::str(cmd.clone()));
    }
    for spec in schema.flags() {
        namespace.insert(spec.name.clone(), read_flag(&matches, spec));
    }

    tracing::debug!("Parsed {} arguments", namespace.len());
    Ok(namespace)
}

fn read_flag(matches: &ArgMatches, spec: &ArgSpec) -> ConfigValue {
    let id = spec.name.as_str();
    if matches.value_source(id) != Some(ValueSource::CommandLine) {
        return spec.default.clone();
    }

    match spec.kind {
        ArgKind::Flag => ConfigValue::bool(true),
        ArgKind::Value(kind) => {
            read_many(matches, id, kind).into_iter().next().map_or(ConfigValue::Null, ConfigValue::Scalar)
        }
        ArgKind::List { kind, .. } => ConfigValue::Sequence(read_many(matches, id, kind)),
    }
}

fn read_many(matches: &ArgMatches, id: &str, kind: ScalarKind) -> Vec<Scalar> {
    match kind {
        ScalarKind::Bool => collect(matches, id, |b: &bool| Scalar::Bool(*b)),
        ScalarKind::Int => collect(matches, id, |i: &i64| Scalar::Int(*i)),
        ScalarKind::Float => collect(matches, id, |x: &f64| Scalar::Float(*x)),
        ScalarKind::Str => collect(matches, id, |s: &String| Scalar::Str(s.clone())),
    }
}

fn collect<T, F>(matches: &ArgMatches, id: &str, f: F) -> Vec<Scalar>
where
    T: std::any::Any + Clone + Send + Sync + 'static,
    F: Fn(&T) -> Scalar,
{
    matches.get_many::<T>(id).map(|vals| vals.map(f).collect()).unwrap_or_default()
}
