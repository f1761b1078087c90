//! Built-in flags every experiment run understands.

use super::schema::{ArgSpec, ArgumentSchema};
use crate::domain::{ConfigValue, ScalarKind};

const DATA: &str = "data";
const OPTIMIZER: &str = "optimizer";
const TRAINING: &str = "training related";
const EXPERIMENT: &str = "experiment related";
const CRITERION: &str = "criterion related";
const MODEL: &str = "model";

pub const COMMANDS: [&str; 2] = ["train", "eval"];

fn str_arg(name: &str, heading: &str, default: Option<&str>) -> ArgSpec {
    let spec = ArgSpec::value(name, ScalarKind::Str).heading(heading);
    match default {
        Some(value) => spec.default_value(ConfigValue::str(value)),
        None => spec,
    }
}

fn int_arg(name: &str, heading: &str, default: Option<i64>) -> ArgSpec {
    let spec = ArgSpec::value(name, ScalarKind::Int).heading(heading);
    match default {
        Some(value) => spec.default_value(ConfigValue::int(value)),
        None => spec,
    }
}

fn float_arg(name: &str, heading: &str, default: f64) -> ArgSpec {
    ArgSpec::value(name, ScalarKind::Float).heading(heading).default_value(ConfigValue::float(default))
}

fn flag_arg(name: &str, heading: &str) -> ArgSpec {
    ArgSpec::flag(name).heading(heading)
}

/// The fixed base schema: `cmd` plus the data, optimizer, training,
/// experiment, criterion and model groups.
pub fn declare_base_arguments() -> ArgumentSchema {
    ArgumentSchema::new(COMMANDS)
        // Data
        .with_flag(str_arg("dataset", DATA, None))
        .with_flag(int_arg("num_workers", DATA, Some(4)))
        .with_flag(int_arg("repeats", DATA, Some(1)))
        .with_flag(str_arg("subset", DATA, Some("val")))
        // Optimizer
        .with_flag(str_arg("optimizer", OPTIMIZER, Some("Adam")))
        .with_flag(float_arg("lr", OPTIMIZER, 1e-4))
        .with_flag(float_arg("weight_decay", OPTIMIZER, 1e-4))
        .with_flag(flag_arg("load_optim", OPTIMIZER))
        .with_flag(flag_arg("save_optim", OPTIMIZER))
        // Training
        .with_flag(int_arg("batch_size", TRAINING, Some(8)))
        .with_flag(int_arg("num_epochs", TRAINING, None))
        .with_flag(str_arg("resume", TRAINING, Some("")))
        .with_flag(
            flag_arg("anew", TRAINING)
                .help("clear history and start from epoch 0 with weights updated"),
        )
        .with_flag(str_arg("device", TRAINING, Some("cpu")))
        // Experiment
        .with_flag(str_arg("exp_dir", EXPERIMENT, Some("../exp/")))
        .with_flag(str_arg("tag", EXPERIMENT, Some("")))
        .with_flag(str_arg("suffix", EXPERIMENT, Some("")))
        .with_flag(str_arg("exp_config", EXPERIMENT, Some("")))
        .with_flag(flag_arg("debug_on", EXPERIMENT))
        .with_flag(flag_arg("inherit_off", EXPERIMENT))
        .with_flag(flag_arg("log_off", EXPERIMENT))
        .with_flag(int_arg("track_intvl", EXPERIMENT, Some(1)))
        // Criterion
        .with_flag(str_arg("criterion", CRITERION, Some("NLL")))
        .with_flag(ArgSpec::list("weights", ScalarKind::Float, 1).heading(CRITERION))
        // Model
        .with_flag(str_arg("model", MODEL, None))
}
