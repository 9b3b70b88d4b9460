use std::fmt;

/// Batch scheduler kinds understood by simbatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheduler {
    /// Sun Grid Engine: `qsub`, `.qjob` files, `$SGE_TASK_ID`.
    Sge,
    /// SLURM: `sbatch`, `.slrm` files, `$SLURM_ARRAY_TASK_ID`.
    Slurm,
}

impl Scheduler {
    /// All supported schedulers.
    pub const ALL: [Scheduler; 2] = [Scheduler::Sge, Scheduler::Slurm];

    /// In-template spelling, as written in `%jobmanager KIND%`.
    pub fn name(&self) -> &'static str {
        match self {
            Scheduler::Sge => "SGE",
            Scheduler::Slurm => "SLURM",
        }
    }

    /// External command used to submit a job file.
    pub fn submit_command(&self) -> &'static str {
        match self {
            Scheduler::Sge => "qsub",
            Scheduler::Slurm => "sbatch",
        }
    }

    /// File extension of generated job files (without the dot).
    pub fn file_extension(&self) -> &'static str {
        match self {
            Scheduler::Sge => "qjob",
            Scheduler::Slurm => "slrm",
        }
    }

    /// Environment variable holding the array-task index at run time.
    ///
    /// The job file references this variable in its `%input_path%`
    /// substitution so one file drives the whole array job.
    pub fn task_index_var(&self) -> &'static str {
        match self {
            Scheduler::Sge => "$SGE_TASK_ID",
            Scheduler::Slurm => "$SLURM_ARRAY_TASK_ID",
        }
    }

    /// Parse the in-template spelling. Case-sensitive, matching the
    /// directive vocabulary.
    pub fn from_name(name: &str) -> Option<Scheduler> {
        match name {
            "SGE" => Some(Scheduler::Sge),
            "SLURM" => Some(Scheduler::Slurm),
            _ => None,
        }
    }
}

impl fmt::Display for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
