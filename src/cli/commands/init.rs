//! `mingle init` command - Initialize a new membership directory

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::directory::{DirectoryError, MemberDirectory, DEFAULT_INTERESTS};
use crate::core::store;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Force initialization even if .mingle/ already exists
    #[arg(long)]
    pub force: bool,

    /// Skip seeding the default interests
    #[arg(long)]
    pub no_seed: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    // Create directory if it doesn't exist
    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let directory = if args.force {
        MemberDirectory::init_force(&path)
    } else {
        MemberDirectory::init(&path)
    };

    match directory {
        Ok(dir) => {
            if !args.no_seed {
                seed_interests(&dir)?;
            }

            println!(
                "{} Initialized membership directory at {}",
                style("✓").green(),
                style(dir.root().display()).cyan()
            );
            println!();
            println!("Created structure:");
            for entry in [".mingle/", ".mingle/config.yaml", "members/", "interests/"] {
                println!("  {}", style(entry).dim());
            }
            println!();
            println!("Next steps:");
            println!("  {} Register the first member", style("mingle register").yellow());
            println!("  {} Browse interests", style("mingle interest list").yellow());
            println!("  {} Validate directory records", style("mingle validate").yellow());
            Ok(())
        }
        Err(DirectoryError::AlreadyExists(path)) => {
            println!(
                "{} Membership directory already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!("Use {} to reinitialize", style("mingle init --force").yellow());
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn seed_interests(dir: &MemberDirectory) -> Result<()> {
    for name in DEFAULT_INTERESTS {
        match store::add_interest(dir, name) {
            Ok(_) => {}
            // Re-running init --force keeps existing interests
            Err(store::StoreError::DuplicateInterest) => {}
            Err(e) => return Err(miette::miette!("{}", e)),
        }
    }
    Ok(())
}
