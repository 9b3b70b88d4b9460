//! Hand generated job files to the scheduler's external submit command.

use std::fs;
use std::path::Path;
use std::process::Command;

use crate::domain::{AppError, Scheduler};

/// Submit every job file in `dir` whose extension matches `scheduler`'s
/// convention. Returns the number of files submitted.
///
/// Files are processed in sorted name order. A submit command that cannot be
/// launched aborts the run, consistent with the fail-fast policy of the
/// generator; a command that launches but exits non-zero is reported on
/// stderr and submission continues.
pub fn submit_jobs(dir: &Path, scheduler: Scheduler) -> Result<usize, AppError> {
    let mut job_files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(scheduler.file_extension())
        {
            job_files.push(path);
        }
    }
    job_files.sort();

    for path in &job_files {
        println!("Submitting {}", path.display());
        let status = Command::new(scheduler.submit_command()).arg(path).status().map_err(
            |err| AppError::SubmitInvocation {
                command: format!("{} {}", scheduler.submit_command(), path.display()),
                details: err.to_string(),
            },
        )?;
        if !status.success() {
            eprintln!(
                "Warning: {} exited with {} for {}",
                scheduler.submit_command(),
                status,
                path.display()
            );
        }
    }

    Ok(job_files.len())
}
