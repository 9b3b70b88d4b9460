use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use simbatch::{AppError, CreateOptions, FloatSpacing, Scheduler};

#[derive(Parser)]
#[command(name = "simbatch")]
#[command(version)]
#[command(
    about = "Generate batches of YAML and scheduler job files from an annotated template",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create YAML and job files from a template file
    #[clap(visible_alias = "c")]
    Create {
        /// Path to the template file (YAML and job templates plus directives)
        #[arg(short, long)]
        input: PathBuf,
        /// Output directory (overrides the template's %output% block)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Scheduler kind (overrides the template's %jobmanager% marker)
        #[arg(short = 'j', long = "jobmanager")]
        jobmanager: Option<String>,
        /// Endpoint behavior of %f BEGIN END% float ranges
        #[arg(long, value_enum, default_value_t = SpacingArg::Inclusive)]
        float_spacing: SpacingArg,
        /// Submit the generated job file after creating it
        #[arg(short, long)]
        submit: bool,
    },
    /// Submit all job files in a directory
    #[clap(visible_alias = "s")]
    Submit {
        /// Directory containing job files
        #[arg(short, long)]
        output: PathBuf,
        /// Scheduler kind (SGE submits *.qjob files, SLURM submits *.slrm)
        #[arg(short = 'j', long = "jobmanager")]
        jobmanager: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SpacingArg {
    Inclusive,
    Exclusive,
}

impl From<SpacingArg> for FloatSpacing {
    fn from(value: SpacingArg) -> Self {
        match value {
            SpacingArg::Inclusive => FloatSpacing::Inclusive,
            SpacingArg::Exclusive => FloatSpacing::Exclusive,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), AppError> = match cli.command {
        Commands::Create { input, output, jobmanager, float_spacing, submit } => {
            run_create(input, output, jobmanager, float_spacing.into(), submit)
        }
        Commands::Submit { output, jobmanager } => run_submit(&output, &jobmanager),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_create(
    input: PathBuf,
    output: Option<PathBuf>,
    jobmanager: Option<String>,
    float_spacing: FloatSpacing,
    submit: bool,
) -> Result<(), AppError> {
    let options = CreateOptions { input, output, scheduler: jobmanager, float_spacing };
    let outcome = simbatch::create(&options)?;
    println!(
        "Created {} config file(s) and {} in {}",
        outcome.config_files,
        outcome.job_file.display(),
        outcome.output_dir.display()
    );

    if submit {
        let submitted = simbatch::submit(&outcome.output_dir, outcome.scheduler)?;
        println!("Submitted {} job file(s)", submitted);
    }
    Ok(())
}

fn run_submit(output: &std::path::Path, jobmanager: &str) -> Result<(), AppError> {
    let scheduler = Scheduler::from_name(jobmanager)
        .ok_or_else(|| AppError::UnknownScheduler(jobmanager.to_string()))?;
    let submitted = simbatch::submit(output, scheduler)?;
    println!("Submitted {} job file(s)", submitted);
    Ok(())
}
