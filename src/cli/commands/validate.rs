//! `mingle validate` command - Validate directory records against schemas

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::{helpers, GlobalOpts};
use crate::schema::Validator;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Paths to validate (default: entire directory)
    #[arg()]
    pub paths: Vec<PathBuf>,

    /// Show summary only, don't show individual errors
    #[arg(long)]
    pub summary: bool,
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    files_checked: usize,
    files_passed: usize,
    files_failed: usize,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let dir = helpers::open_directory(global)?;
    let validator = Validator::default();

    let files: Vec<PathBuf> = if args.paths.is_empty() {
        let mut files = Vec::new();
        for records_dir in [dir.members_dir(), dir.interests_dir()] {
            if let Ok(entries) = std::fs::read_dir(&records_dir) {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().map_or(false, |e| e == "yaml") {
                        files.push(path);
                    }
                }
            }
        }
        files.sort();
        files
    } else {
        args.paths.clone()
    };

    if !global.quiet {
        println!("{} Validating {} file(s)...", style("→").blue(), files.len());
        println!();
    }

    let mut stats = ValidationStats::default();

    for path in &files {
        stats.files_checked += 1;
        match validator.validate_file(path) {
            Ok(()) => {
                stats.files_passed += 1;
                if global.verbose {
                    println!("{} {}", style("✓").green(), path.display());
                }
            }
            Err(e) => {
                stats.files_failed += 1;
                println!("{} {}", style("✗").red(), path.display());
                if !args.summary {
                    eprintln!("{:?}", miette::Report::new(e));
                }
            }
        }
    }

    println!();
    if stats.files_failed == 0 {
        println!(
            "{} {} file(s) valid",
            style("✓").green(),
            stats.files_passed
        );
        Ok(())
    } else {
        println!(
            "{} {} of {} file(s) failed validation",
            style("✗").red(),
            stats.files_failed,
            stats.files_checked
        );
        Err(miette::miette!("validation failed"))
    }
}
