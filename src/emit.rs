//! File emission: one YAML configuration file per index, plus the single
//! array-job file per run.
//!
//! Substitution order inside a configuration file is fixed: `%i%`, then the
//! positional `%f<k>%` float markers, then `%eval%` markers, then
//! `%job_name%`. Expressions only ever see the bound environment (`i`, `i0`,
//! `i1`, preamble variables), never the partially substituted text.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppError, FloatSpacing, JobConfig, format_float};
use crate::eval::Evaluator;

/// Create `dir` if needed, then delete any regular files already in it.
///
/// Subdirectories are left alone. Running before every generation keeps the
/// directory free of stale files from earlier runs.
pub fn clear_output_dir(dir: &Path) -> Result<(), AppError> {
    fs::create_dir_all(dir)?;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Name of the per-index configuration file. Also used with the scheduler's
/// task-index variable in place of the index when composing the job file.
fn config_file_name(index: impl std::fmt::Display) -> String {
    format!("tmp{index}.yaml")
}

/// Write one configuration file per index into `dir`, ascending. Returns the
/// number of files written.
pub fn emit_config_files(
    config: &JobConfig,
    dir: &Path,
    spacing: FloatSpacing,
) -> Result<usize, AppError> {
    let indices = config.int_range();
    let float_sequences: Vec<Vec<f64>> = config
        .float_ranges
        .iter()
        .map(|range| range.expand(indices.len(), spacing))
        .collect();

    for (position, &index) in indices.iter().enumerate() {
        let mut body = config.yaml_template.replace("%i%", &index.to_string());
        for (slot, sequence) in float_sequences.iter().enumerate() {
            body = body.replace(&format!("%f{slot}%"), &format_float(sequence[position]));
        }
        let evaluator =
            Evaluator::for_index(index, config.i0, config.i1, config.preamble.as_deref())?;
        body = evaluator.substitute(&body)?;
        body = body.replace("%job_name%", &config.job_name);
        fs::write(dir.join(config_file_name(index)), body)?;
    }

    Ok(indices.len())
}

/// Compose the single job file for this run and return its path.
///
/// The `%input_path%` substitution is parameterized by the scheduler's
/// task-index environment variable: one job file drives an array job over
/// the whole index range. Expressions are evaluated once, anchored at `i0`.
pub fn compose_job_file(config: &JobConfig, dir: &Path) -> Result<PathBuf, AppError> {
    let scheduler = config.scheduler;
    let template = config.applicable_job_template().ok_or_else(|| {
        AppError::MissingTemplate { scheduler: scheduler.name().to_string() }
    })?;

    let input_path = dir.join(config_file_name(scheduler.task_index_var()));

    let mut body = template.replace("%job_name%", &config.job_name);
    body = body.replace("%jar_path%", &config.jar_path);
    body = body.replace("%input_path%", &input_path.to_string_lossy());
    body = body.replace("%i0%", &config.i0.to_string());
    body = body.replace("%i1%", &config.i1.to_string());
    let evaluator =
        Evaluator::for_index(config.i0, config.i0, config.i1, config.preamble.as_deref())?;
    body = evaluator.substitute(&body)?;

    let path = dir.join(format!("{}.{}", config.job_name, scheduler.file_extension()));
    fs::write(&path, body)?;
    Ok(path)
}
