//! specgen - RPM spec template renderer CLI
//!
//! Renders a .spec.j2 template into a distribution-specific .spec file,
//! resolving the spec style, epoch table and requirement constraints first.

use clap::Parser;
use colored::Colorize;
use specgen::cli::CliArgs;
use specgen::domain::Style;
use specgen::error::IoError;
use specgen::manifest::{EpochTable, RequirementTable};
use specgen::render::{generate_spec, RenderContext};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if let Err(e) = std::fs::metadata(&args.template) {
        return Err(IoError::TemplateRead {
            path: args.template.clone(),
            source: e,
        }
        .into());
    }

    let style = Style::resolve(args.spec_style)?;
    let epochs = EpochTable::load(args.epochs.as_deref())?;
    let requirements = RequirementTable::merge(&args.requirements)?;

    if args.verbose {
        eprintln!("specgen v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Template: {}", args.template.display());
        eprintln!("Style: {}", style);
        eprintln!(
            "Tables: {} epoch(s), {} requirement(s)",
            epochs.len(),
            requirements.len()
        );
    }

    let ctx = Arc::new(
        RenderContext::new(style, args.template_dir())
            .with_epochs(epochs)
            .with_requirements(requirements)
            .with_output_dir(args.output_dir())
            .with_quiet(args.quiet),
    );
    let spec = generate_spec(ctx, &args.template)?;

    match args.output {
        Some(ref path) => {
            let mut content = spec;
            if !content.ends_with('\n') {
                content.push('\n');
            }
            std::fs::write(path, content).map_err(|e| IoError::OutputWrite {
                path: path.clone(),
                source: e,
            })?;
            if args.verbose {
                eprintln!("Wrote {}", path.display());
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", spec)?;
            stdout.flush()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
