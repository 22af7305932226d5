use clap::Parser;
use layer_guard::cli::format;
use layer_guard::cli::{Cli, Commands, OutputFormat};
use layer_guard::config::{Config, Severity, STARTER_CONFIG};
use layer_guard::scan;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    match cli.command {
        Commands::Check {
            paths,
            config,
            format: output_format,
            fix,
        } => {
            let config = load_config(config.as_deref(), &cwd);

            let mut result = match scan::run_scan(&config, &cwd, &paths) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("\x1b[31merror\x1b[0m: {}", e);
                    process::exit(2);
                }
            };

            if fix && result.fixable() > 0 {
                match scan::apply_fixes(&result) {
                    Ok(changed) => {
                        result.violations.retain(|v| v.fix.is_none());
                        eprintln!(
                            "\x1b[32m✓\x1b[0m Sorted imports in {} file{}",
                            changed,
                            if changed == 1 { "" } else { "s" }
                        );
                    }
                    Err(e) => {
                        eprintln!("\x1b[31merror\x1b[0m: {}", e);
                        process::exit(2);
                    }
                }
            }

            match output_format {
                OutputFormat::Pretty => format::print_pretty(&result),
                OutputFormat::Json => format::print_json(&result),
                OutputFormat::Compact => format::print_compact(&result),
                OutputFormat::Github => format::print_github(&result),
            }

            let has_errors = result
                .violations
                .iter()
                .any(|v| v.severity == Severity::Error);

            process::exit(if has_errors { 1 } else { 0 });
        }

        Commands::Init { output, force } => {
            if output.exists() && !force {
                eprintln!(
                    "\x1b[31merror\x1b[0m: '{}' already exists (use --force to overwrite)",
                    output.display()
                );
                process::exit(2);
            }

            if let Err(e) = fs::write(&output, STARTER_CONFIG) {
                eprintln!("\x1b[31merror\x1b[0m: failed to write config: {}", e);
                process::exit(2);
            }

            eprintln!("\x1b[32m✓\x1b[0m Created {}", output.display());
            eprintln!(
                "\x1b[90mhint\x1b[0m: run \x1b[1mlayer-guard check src\x1b[0m to find violations"
            );
        }

        Commands::Rules { config } => {
            let config = load_config(config.as_deref(), &cwd);
            format::print_rules(&config);
        }
    }
}

fn load_config(explicit: Option<&Path>, cwd: &Path) -> Config {
    match Config::resolve(explicit, cwd) {
        Ok(c) => c,
        Err(e) if e.is_not_found() => {
            eprintln!("\x1b[31merror\x1b[0m: {}", e);
            eprintln!(
                "\x1b[90mhint\x1b[0m: run \x1b[1mlayer-guard init\x1b[0m to generate a starter config"
            );
            process::exit(2);
        }
        Err(e) => {
            eprintln!("\x1b[31merror\x1b[0m: {}", e);
            process::exit(2);
        }
    }
}
