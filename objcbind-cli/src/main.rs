use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use objcbind_spec::loader::{self, LoadedBindings};
use objcbind_spec::{ResolutionStrategy, Severity, ValidationReport};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "objcbind", about = "objcbind – native proxy classes for managed types")]
#[command(version, propagate_version = true)]
struct Cli {
    /// Log emitter activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate class descriptors
    Check {
        /// A *.class.json file or a directory of them
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Emit proxy class skeletons
    Emit {
        /// A *.class.json file or a directory of them
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Output directory (defaults to ./generated)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the configured class-resolution strategy
        #[arg(short, long)]
        resolution: Option<ResolutionArg>,
        /// Override the symbol guarding the token resolution path
        #[arg(long)]
        toggle_symbol: Option<String>,
    },
    /// Print the JSON Schema of class descriptors
    Schema {
        /// Print the config file schema instead
        #[arg(long)]
        config: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResolutionArg {
    Token,
    Name,
}

impl From<ResolutionArg> for ResolutionStrategy {
    fn from(arg: ResolutionArg) -> Self {
        match arg {
            ResolutionArg::Token => ResolutionStrategy::Token,
            ResolutionArg::Name => ResolutionStrategy::Name,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Check { path } => cmd_check(&path),
        Command::Emit {
            path,
            output,
            resolution,
            toggle_symbol,
        } => cmd_emit(&path, output.as_deref(), resolution, toggle_symbol),
        Command::Schema { config } => cmd_schema(config),
    };

    match result {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load a single descriptor file or a whole directory of them.
fn load(path: &Path) -> Result<(LoadedBindings, ValidationReport)> {
    let loaded = if path.is_file() {
        loader::load_descriptor_file(path)
    } else {
        loader::load_bindings(path)
    };
    loaded.with_context(|| format!("Failed to load descriptors at '{}'", path.display()))
}

fn print_report(report: &ValidationReport) {
    for entry in &report.errors {
        let severity_str = match entry.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };

        println!(
            "  {} [{}] {} ({}:{})",
            severity_str,
            entry.code.dimmed(),
            entry.message,
            entry.file.dimmed(),
            entry.path.dimmed(),
        );

        if let Some(suggestion) = &entry.suggestion {
            println!("    {} {}", "hint:".cyan(), suggestion);
        }
    }
}

fn cmd_check(path: &Path) -> Result<bool> {
    println!(
        "{} {}",
        "Checking".bold(),
        path.canonicalize()
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
    );

    let (bindings, mut report) = load(path)?;
    report.merge(loader::validate_bindings(&bindings));
    print_report(&report);

    let error_count = report.count(Severity::Error);
    let warning_count = report.count(Severity::Warning);

    println!();
    if error_count == 0 {
        let roots = bindings
            .classes
            .iter()
            .filter(|(_, d)| d.owns_backing_handle())
            .count();
        let statics = bindings.classes.iter().filter(|(_, d)| d.is_static).count();
        println!(
            "{} {} class(es) valid ({} hierarchy root(s), {} static), {} warning(s)",
            "✓".green().bold(),
            bindings.classes.len(),
            roots,
            statics,
            warning_count,
        );
        Ok(true)
    } else {
        println!(
            "{} {} error(s), {} warning(s)",
            "✗".red().bold(),
            error_count,
            warning_count,
        );
        Ok(false)
    }
}

fn cmd_emit(
    path: &Path,
    output: Option<&Path>,
    resolution: Option<ResolutionArg>,
    toggle_symbol: Option<String>,
) -> Result<bool> {
    println!(
        "{} {}",
        "Emitting skeletons from".bold(),
        path.canonicalize()
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
    );

    // 1. Load, with CLI overrides applied before validation
    let (mut bindings, mut report) = load(path)?;

    if let Some(resolution) = resolution {
        bindings.config.resolution = resolution.into();
    }
    if let Some(symbol) = toggle_symbol {
        bindings.config.toggle_symbol = symbol;
    }

    // 2. Validate (config included)
    report.merge(loader::validate_bindings(&bindings));
    if report.has_errors() {
        print_report(&report);
        eprintln!(
            "{} {} error(s), fix them before emitting",
            "✗".red().bold(),
            report.count(Severity::Error)
        );
        return Ok(false);
    }

    // 3. Generate
    let generator = objcbind_codegen::SkeletonGenerator::new(bindings.config.clone());
    let generated = generator
        .generate(&bindings.descriptors())
        .map_err(|e| anyhow::anyhow!("Generation failed: {}", e))?;

    // 4. Write output
    let output_dir = match output {
        Some(d) => d.to_path_buf(),
        None => PathBuf::from("generated"),
    };

    generated
        .write_to_disk(&output_dir)
        .with_context(|| format!("Failed to write to '{}'", output_dir.display()))?;

    println!(
        "{} Generated {} file(s) → {}",
        "✓".green().bold(),
        generated.file_count(),
        output_dir.display()
    );

    for file_path in generated.files().keys() {
        println!("  {} {}", "→".dimmed(), file_path);
    }

    Ok(true)
}

fn cmd_schema(config: bool) -> Result<bool> {
    let schema = if config {
        objcbind_spec::schema_def::generate_config_schema()
    } else {
        objcbind_spec::schema_def::generate_descriptor_schema()
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn check_bank_fixture_ok() {
        assert!(cmd_check(&fixture("bank")).unwrap());
    }

    #[test]
    fn check_invalid_fixture_fails() {
        assert!(!cmd_check(&fixture("invalid")).unwrap());
    }

    #[test]
    fn check_missing_path_is_error() {
        assert!(cmd_check(Path::new("/nonexistent/bindings")).is_err());
    }

    #[test]
    fn emit_bank_fixture() {
        let tmp = TempDir::new().unwrap();
        let ok = cmd_emit(&fixture("bank"), Some(tmp.path()), None, None).unwrap();
        assert!(ok);

        assert!(tmp.path().join("Account.h").exists());
        assert!(tmp.path().join("Account.m").exists());
        assert!(tmp.path().join("Rates.m").exists());
        let support = std::fs::read_to_string(tmp.path().join("objcbind-support.h")).unwrap();
        assert!(support.contains("#define TOKENLOOKUP 1"));
    }

    #[test]
    fn emit_with_resolution_override() {
        let tmp = TempDir::new().unwrap();
        let ok = cmd_emit(
            &fixture("bank"),
            Some(tmp.path()),
            Some(ResolutionArg::Name),
            Some("BANK_TOKENS".to_string()),
        )
        .unwrap();
        assert!(ok);

        let support = std::fs::read_to_string(tmp.path().join("objcbind-support.h")).unwrap();
        assert!(support.contains("#define BANK_TOKENS 0"));
        let account = std::fs::read_to_string(tmp.path().join("Account.m")).unwrap();
        assert!(account.contains("#if BANK_TOKENS\n"));
    }

    #[test]
    fn emit_single_descriptor_file() {
        let tmp = TempDir::new().unwrap();
        let file = fixture("bank").join("rates.class.json");
        let ok = cmd_emit(&file, Some(tmp.path()), None, None).unwrap();
        assert!(ok);
        assert!(tmp.path().join("Rates.h").exists());
        assert!(!tmp.path().join("Rates+Internal.h").exists());
    }

    #[test]
    fn emit_invalid_fixture_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let ok = cmd_emit(&fixture("invalid"), Some(&out), None, None).unwrap();
        assert!(!ok);
        assert!(!out.exists());
    }

    #[test]
    fn emit_rejects_bad_toggle_symbol() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let ok = cmd_emit(
            &fixture("bank"),
            Some(&out),
            None,
            Some("NOT A SYMBOL".to_string()),
        )
        .unwrap();
        assert!(!ok);
        assert!(!out.exists());
    }

    #[test]
    fn check_counts_nested_config_warning() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("bank");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::copy(
            fixture("bank").join("rates.class.json"),
            nested.join("rates.class.json"),
        )
        .unwrap();
        std::fs::write(nested.join("objcbind.config.json"), "{}").unwrap();

        let (_, report) = load(tmp.path()).unwrap();
        assert_eq!(report.count(Severity::Warning), 1);
        assert!(cmd_check(tmp.path()).unwrap());
    }

    #[test]
    fn cli_parses_emit_flags() {
        let cli = Cli::try_parse_from([
            "objcbind", "emit", "bindings", "-o", "out", "--resolution", "token", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Emit {
                path,
                output,
                resolution,
                ..
            } => {
                assert_eq!(path, PathBuf::from("bindings"));
                assert_eq!(output, Some(PathBuf::from("out")));
                assert!(matches!(resolution, Some(ResolutionArg::Token)));
            }
            _ => panic!("expected emit"),
        }
    }
}
