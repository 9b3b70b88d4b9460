//! Shared testing utilities for simbatch CLI tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Testing harness providing an isolated environment for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        Self { root, work_dir }
    }

    /// Directory CLI invocations run in.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Conventional output directory for generated files.
    pub fn output_dir(&self) -> PathBuf {
        self.work_dir.join("out")
    }

    /// Write a template file into the work directory and return its path.
    pub fn write_template(&self, name: &str, content: &str) -> PathBuf {
        let path = self.work_dir.join(name);
        fs::write(&path, content).expect("Failed to write template");
        path
    }

    /// Build a command for invoking the compiled simbatch binary.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("simbatch").expect("Failed to locate simbatch binary");
        cmd.current_dir(&self.work_dir);
        cmd
    }

    /// Install a fake scheduler submit command under an isolated bin
    /// directory. The script appends its arguments to the returned log file
    /// and exits 0.
    pub fn fake_submit(&self, command: &str) -> FakeSubmit {
        FakeSubmit::new(self.root.path(), command)
    }
}

/// A fake `qsub`/`sbatch` on PATH, logging every invocation.
#[allow(dead_code)]
pub struct FakeSubmit {
    pub bin_dir: PathBuf,
    pub log_file: PathBuf,
}

#[allow(dead_code)]
impl FakeSubmit {
    fn new(root: &Path, command: &str) -> Self {
        let bin_dir = root.join("fake_bin");
        fs::create_dir_all(&bin_dir).expect("Failed to create fake bin dir");
        let log_file = root.join(format!("{command}.log"));

        let script_path = bin_dir.join(command);
        let script = format!("#!/bin/sh\necho \"$@\" >> \"{}\"\nexit 0\n", log_file.display());
        fs::write(&script_path, script).expect("Failed to write fake submit script");

        let mut perms =
            fs::metadata(&script_path).expect("Failed to read metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script_path, perms).expect("Failed to set permissions");

        Self { bin_dir, log_file }
    }

    /// PATH value exposing only the fake bin directory.
    pub fn path_env(&self) -> String {
        self.bin_dir.display().to_string()
    }

    /// Logged invocations, one line per call.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(&self.log_file)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
