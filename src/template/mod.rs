//! Directive extraction from annotated template text.
//!
//! Templates mix free-form YAML/job text with `%...%` markers. Two marker
//! shapes exist: single-line directives (`%range 1 10%`) and delimited
//! blocks (`%yaml begin% ... %yaml end%`). Markers are located with an
//! explicit scanner rather than search-and-replace, so extraction order is
//! fixed and delimited regions end up as separate template strings.

mod scan;

use std::path::{Path, PathBuf};

use crate::domain::{AppError, FloatRange, JobConfig, Scheduler};
use scan::{extract_block, find_inline};

/// Parse raw template text into a [`JobConfig`].
///
/// `output_override` and `scheduler_override` come from the command line and
/// take precedence over the in-template `%output%` block and `%jobmanager%`
/// marker respectively.
pub fn parse_template(
    text: &str,
    job_name: &str,
    output_override: Option<&Path>,
    scheduler_override: Option<&str>,
) -> Result<JobConfig, AppError> {
    let mut working = text.to_string();

    // %range BEGIN END% is required and removed from the working text.
    let range = find_inline(&working, "range").ok_or(AppError::MissingDirective("range"))?;
    let (i0, i1) = parse_range_args(&range.args)?;
    working.replace_range(range.span, "");

    // %jar PATH% is required and removed.
    let jar = find_inline(&working, "jar").ok_or(AppError::MissingDirective("jar"))?;
    let jar_path = jar.args.clone();
    working.replace_range(jar.span, "");

    // Scheduler kind: command-line override wins over the in-template marker.
    let scheduler_name = match (scheduler_override, find_inline(&working, "jobmanager")) {
        (Some(name), _) => name.to_string(),
        (None, Some(directive)) => {
            let name = directive.args.clone();
            working.replace_range(directive.span, "");
            name
        }
        (None, None) => return Err(AppError::UnknownScheduler("(not specified)".to_string())),
    };
    let scheduler = Scheduler::from_name(&scheduler_name)
        .ok_or(AppError::UnknownScheduler(scheduler_name))?;

    let yaml_raw =
        extract_block(&working, "yaml", true).ok_or(AppError::MissingDirective("yaml"))?;

    let job_template = extract_block(&working, "job", true);
    let sge_job_template = extract_block(&working, "SGE job", true);
    let slurm_job_template = extract_block(&working, "SLURM job", true);

    let preamble = extract_block(&working, "exec", true);

    // Output directory: command-line override > %output% block > unset.
    // Unset only becomes an error once files must be produced.
    let output_dir = match output_override {
        Some(path) => Some(path.to_path_buf()),
        None => extract_block(&working, "output", false)
            .map(|body| PathBuf::from(body.trim().replace("%job_name%", job_name))),
    };

    let (yaml_template, float_ranges) = reindex_float_ranges(&yaml_raw)?;

    let config = JobConfig {
        job_name: job_name.to_string(),
        jar_path,
        scheduler,
        yaml_template,
        job_template,
        sge_job_template,
        slurm_job_template,
        i0,
        i1,
        float_ranges,
        preamble,
        output_dir,
    };

    if config.applicable_job_template().is_none() {
        return Err(AppError::MissingTemplate { scheduler: scheduler.name().to_string() });
    }

    Ok(config)
}

/// Rewrite every `%f BEGIN END%` directive in the YAML body to a positional
/// `%f<k>%` marker, collecting the bounds in order of first appearance.
///
/// All occurrences of one directive's literal text share a single slot, so
/// identical ranges reused in the template cannot collide with each other.
fn reindex_float_ranges(yaml: &str) -> Result<(String, Vec<FloatRange>), AppError> {
    let mut text = yaml.to_string();
    let mut ranges = Vec::new();
    while let Some(directive) = find_inline(&text, "f") {
        let literal = text[directive.span.clone()].to_string();
        let range = parse_float_args(&directive.args)?;
        let marker = format!("%f{}%", ranges.len());
        text = text.replace(&literal, &marker);
        ranges.push(range);
    }
    Ok((text, ranges))
}

fn parse_range_args(args: &str) -> Result<(i64, i64), AppError> {
    let malformed = |details: String| AppError::MalformedDirective { directive: "range", details };
    let mut parts = args.split_whitespace();
    let (Some(begin), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed(format!("expected two integers, got '{args}'")));
    };
    let i0: i64 =
        begin.parse().map_err(|_| malformed(format!("'{begin}' is not an integer")))?;
    let i1: i64 = end.parse().map_err(|_| malformed(format!("'{end}' is not an integer")))?;
    if i1 < i0 {
        return Err(malformed(format!("end {i1} is below begin {i0}")));
    }
    Ok((i0, i1))
}

fn parse_float_args(args: &str) -> Result<FloatRange, AppError> {
    let malformed = |details: String| AppError::MalformedDirective { directive: "f", details };
    let mut parts = args.split_whitespace();
    let (Some(begin), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed(format!("expected two floats, got '{args}'")));
    };
    let start: f64 = begin.parse().map_err(|_| malformed(format!("'{begin}' is not a float")))?;
    let end: f64 = end.parse().map_err(|_| malformed(format!("'{end}' is not a float")))?;
    Ok(FloatRange { start, end })
}
