//! `mingle interest` command - Interest management

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::{helpers, GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::store;
use crate::entities::interest::Interest;

#[derive(clap::Subcommand, Debug)]
pub enum InterestCommands {
    /// List interests with member counts
    List(ListArgs),

    /// Add a new interest
    Add(AddArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show count only, not the interests
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Name of the interest
    pub name: String,
}

pub fn run(cmd: InterestCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        InterestCommands::List(args) => run_list(args, global),
        InterestCommands::Add(args) => run_add(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let dir = helpers::open_directory(global)?;
    let config = Config::load(Some(&dir));

    let mut interests = store::all_interests(&dir).map_err(|e| miette::miette!("{}", e))?;
    interests.sort_by(|a, b| a.name.cmp(&b.name));

    if args.count {
        println!("{}", interests.len());
        return Ok(());
    }

    match helpers::effective_format(global, &config) {
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&interests).into_diagnostic()?);
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&interests).into_diagnostic()?
            );
        }
        OutputFormat::Id => {
            for interest in &interests {
                println!("{}", interest.id);
            }
        }
        OutputFormat::Auto | OutputFormat::Table => print_table(&interests),
    }
    Ok(())
}

fn print_table(interests: &[Interest]) {
    println!(
        "{:<17} {:<32} {}",
        style("ID").bold(),
        style("NAME").bold(),
        style("MEMBERS").bold()
    );
    for interest in interests {
        println!(
            "{:<17} {:<32} {}",
            helpers::format_short_id(&interest.id),
            helpers::truncate_str(&interest.name, 32),
            interest.users.len()
        );
    }
    println!();
    println!("{} interest(s)", interests.len());
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let dir = helpers::open_directory(global)?;

    let interest = store::add_interest(&dir, &args.name).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!(
            "{} Added interest {} ({})",
            style("✓").green(),
            style(&interest.name).bold(),
            interest.id
        );
    }
    Ok(())
}
