//! Argument schema: the set of flags a command line is parsed against.
//!
//! The schema is a plain value. Adding a flag returns a new schema, and a
//! flag with an already-declared name replaces the old declaration.

use crate::domain::{ConfigValue, ScalarKind};
use clap::{builder::PossibleValuesParser, value_parser, Arg, ArgAction, Command};

/// How a flag consumes command-line tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Exactly one value of the given kind
    Value(ScalarKind),
    /// Zero-argument toggle; presence means `true`
    Flag,
    /// `min` or more values of one kind
    List { kind: ScalarKind, min: usize },
}

/// One declared flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    pub name: String,
    pub kind: ArgKind,
    pub default: ConfigValue,
    pub heading: Option<String>,
    pub help: Option<String>,
}

impl ArgSpec {
    pub fn value(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::new(name, ArgKind::Value(kind), ConfigValue::Null)
    }

    /// A toggle defaulting to `false`.
    ///
    /// Supplying the flag always yields `true`, so a toggle whose default was
    /// raised to `true` cannot be switched off from the command line.
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::Flag, ConfigValue::bool(false))
    }

    pub fn list(name: impl Into<String>, kind: ScalarKind, min: usize) -> Self {
        Self::new(name, ArgKind::List { kind, min }, ConfigValue::Null)
    }

    fn new(name: impl Into<String>, kind: ArgKind, default: ConfigValue) -> Self {
        Self { name: name.into(), kind, default, heading: None, help: None }
    }

    pub fn default_value(mut self, default: ConfigValue) -> Self {
        self.default = default;
        self
    }

    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.name.clone()).long(self.name.clone());
        if let Some(heading) = &self.heading {
            arg = arg.help_heading(heading.clone());
        }

        let help = match (&self.help, &self.default) {
            (Some(help), ConfigValue::Null) => help.clone(),
            (Some(help), default) => format!("{help} [default: {default}]"),
            (None, ConfigValue::Null) => String::new(),
            (None, default) => format!("[default: {default}]"),
        };
        if !help.is_empty() {
            arg = arg.help(help);
        }

        match self.kind {
            ArgKind::Flag => arg.action(ArgAction::SetTrue),
            ArgKind::Value(kind) => with_parser(arg.action(ArgAction::Set).num_args(1), kind),
            ArgKind::List { kind, min } => {
                with_parser(arg.action(ArgAction::Set).num_args(min..), kind)
            }
        }
    }
}

fn with_parser(arg: Arg, kind: ScalarKind) -> Arg {
    match kind {
        ScalarKind::Bool => arg.value_parser(value_parser!(bool)),
        ScalarKind::Int => arg.value_parser(value_parser!(i64)).allow_negative_numbers(true),
        ScalarKind::Float => arg.value_parser(value_parser!(f64)).allow_negative_numbers(true),
        ScalarKind::Str => arg.value_parser(value_parser!(String)),
    }
}

/// Positional command choices plus an ordered list of flags.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSchema {
    commands: Vec<String>,
    flags: Vec<ArgSpec>,
}

impl ArgumentSchema {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { commands: commands.into_iter().map(Into::into).collect(), flags: Vec::new() }
    }

    /// Return a schema with `spec` added, replacing any flag of the same name.
    pub fn with_flag(mut self, spec: ArgSpec) -> Self {
        if let Some(pos) = self.flags.iter().position(|f| f.name == spec.name) {
            tracing::debug!("Replacing declared flag --{}", spec.name);
            self.flags.remove(pos);
        }
        self.flags.push(spec);
        self
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn flags(&self) -> &[ArgSpec] {
        &self.flags
    }

    pub fn flag(&self, name: &str) -> Option<&ArgSpec> {
        self.flags.iter().find(|f| f.name == name)
    }

    /// Build the clap command that parses tokens against this schema.
    pub fn to_command(&self) -> Command {
        let cmd_arg = Arg::new(COMMAND_ID)
            .required(true)
            .value_name("CMD")
            .help("Run mode")
            .value_parser(PossibleValuesParser::new(self.commands.clone()));

        let mut command = Command::new("expcfg")
            .about("Resolve layered experiment configuration into one config tree")
            .no_binary_name(true)
            .args_override_self(true)
            .arg(cmd_arg);
        for spec in &self.flags {
            command = command.arg(spec.to_arg());
        }
        command
    }
}

/// Namespace key of the positional command.
pub const COMMAND_ID: &str = "cmd";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_flag_replaces_same_name() {
        let schema = ArgumentSchema::new(["train"])
            .with_flag(ArgSpec::value("lr", ScalarKind::Float).heading("optimizer"))
            .with_flag(ArgSpec::flag("debug_on"))
            .with_flag(ArgSpec::value("lr", ScalarKind::Int).default_value(ConfigValue::int(1)));

        assert_eq!(schema.flags().len(), 2);
        let lr = schema.flag("lr").expect("lr");
        assert_eq!(lr.kind, ArgKind::Value(ScalarKind::Int));
        assert_eq!(lr.default, ConfigValue::int(1));
        assert_eq!(lr.heading, None);
        assert_eq!(schema.flags()[1].name, "lr");
    }

    #[test]
    fn builds_valid_clap_command() {
        let schema = ArgumentSchema::new(["train", "eval"])
            .with_flag(ArgSpec::value("model.depth", ScalarKind::Int).heading("from_file"))
            .with_flag(ArgSpec::list("weights", ScalarKind::Float, 1))
            .with_flag(ArgSpec::flag("anew").help("start over"));
        schema.to_command().debug_assert();
    }
}
