use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LAMBDA_PACKAGE: &str = "exercises_api_lambda";
const LAMBDA_BINARY: &str = "exercises_lambda";
const DIST_DIR: &str = "infra/exercises_api/dist";

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the exercises API workspace",
    long_about = "A unified CLI for CI checks and Lambda packaging in the\n\
                  exercises API workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Build and package the exercises Lambda as a `bootstrap` zip
    ServerlessPackage {
        /// Compilation target triple for the Lambda binary
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build profile used for the binary
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting and clippy
    Lint,
    /// Unit and integration tests
    Test,
    /// Lint + test
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    fn dir_name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    fn as_cargo_flag(self) -> Option<&'static str> {
        match self {
            Self::Debug => None,
            Self::Release => Some("--release"),
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    exit(1);
}

fn run_cargo(args: &[&str]) {
    eprintln!("+ cargo {}", args.join(" "));
    match Command::new("cargo").args(args).status() {
        Ok(status) if status.success() => {}
        Ok(status) => exit(status.code().unwrap_or(1)),
        Err(error) => fail(format!("could not launch cargo: {error}")),
    }
}

fn target_is_installed(target: &str) -> Option<bool> {
    let output = Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output()
        .ok()
        .filter(|output| output.status.success())?;
    Some(
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .any(|line| line.trim() == target),
    )
}

fn package_exercises_lambda(target: &str, profile: BuildProfile) {
    match target_is_installed(target) {
        Some(true) => {}
        Some(false) => fail(format!(
            "rust target `{target}` is missing; run `rustup target add {target}` first"
        )),
        None => eprintln!("warning: rustup unavailable, skipping target check"),
    }

    step("Build exercises lambda binary");
    let mut cargo_args = vec!["build", "-p", LAMBDA_PACKAGE, "--bin", LAMBDA_BINARY];
    cargo_args.extend(["--target", target]);
    cargo_args.extend(profile.as_cargo_flag());
    run_cargo(&cargo_args);

    step("Package lambda zip artifact");
    let binary_path = Path::new("target")
        .join(target)
        .join(profile.dir_name())
        .join(LAMBDA_BINARY);
    let zip_path = Path::new(DIST_DIR).join(format!("{LAMBDA_BINARY}.zip"));

    if let Err(error) = write_bootstrap_zip(&binary_path, &zip_path) {
        fail(format!("packaging {} failed: {error}", binary_path.display()));
    }
    eprintln!("\nPackaged artifact:\n- {}", zip_path.display());
}

// provided.al2023 runs the archive entry named `bootstrap`.
fn write_bootstrap_zip(binary_path: &Path, zip_path: &Path) -> io::Result<()> {
    let binary = fs::read(binary_path)?;
    if let Some(parent) = zip_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut zip = ZipWriter::new(fs::File::create(zip_path)?);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options)?;
    zip.write_all(&binary)?;
    zip.finish()?;
    Ok(())
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_lint() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);
}

fn ci_test() {
    step("Test exercises_api_core");
    run_cargo(&["test", "-p", "exercises_api_core"]);

    step("Test exercises_api_lambda");
    run_cargo(&["test", "-p", LAMBDA_PACKAGE]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { job } => {
            match job {
                CiJob::Lint => ci_lint(),
                CiJob::Test => ci_test(),
                CiJob::Check => {
                    ci_lint();
                    ci_test();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::ServerlessPackage { target, profile } => {
            package_exercises_lambda(&target, profile);
        }
    }
}
