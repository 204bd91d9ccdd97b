//! `mingle member` command - Member management

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Password};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::{helpers, GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::directory::MemberDirectory;
use crate::core::store::{self, UpdateUserParams};
use crate::entities::user::User;
use crate::schema::Validator;

#[derive(clap::Subcommand, Debug)]
pub enum MemberCommands {
    /// List members with filtering
    List(ListArgs),

    /// Show a member's details
    Show(ShowArgs),

    /// Open a member record in your editor
    Edit(EditArgs),

    /// Update a member's profile fields
    Update(UpdateArgs),

    /// Change a member's password
    Passwd(PasswdArgs),

    /// Remove a member
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only members who joined this interest
    #[arg(long, short = 'i')]
    pub interest: Option<String>,

    /// Search in name and email (case-insensitive substring)
    #[arg(long)]
    pub search: Option<String>,

    /// Show count only, not the members
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Member ID (full or partial) or email
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Member ID (full or partial) or email
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Member ID (full or partial) or email
    pub id: String,

    /// New display name
    #[arg(long)]
    pub name: Option<String>,

    /// New email address
    #[arg(long)]
    pub email: Option<String>,

    /// New biography
    #[arg(long)]
    pub about: Option<String>,

    /// Replace the joined interests (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub interests: Option<Vec<String>>,
}

#[derive(clap::Args, Debug)]
pub struct PasswdArgs {
    /// Member ID (full or partial) or email
    pub id: String,

    /// New password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Member ID (full or partial) or email
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Member projection for output: everything except credential material
#[derive(Debug, Serialize)]
struct MemberView {
    id: String,
    name: String,
    email: String,
    admin: bool,
    about: String,
    interests: Vec<String>,
    created: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated: Option<String>,
}

impl From<&User> for MemberView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            admin: user.admin,
            about: user.about.clone(),
            interests: user.interests.clone(),
            created: user.created.to_rfc3339(),
            updated: user.updated.map(|u| u.to_rfc3339()),
        }
    }
}

pub fn run(cmd: MemberCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        MemberCommands::List(args) => run_list(args, global),
        MemberCommands::Show(args) => run_show(args, global),
        MemberCommands::Edit(args) => run_edit(args, global),
        MemberCommands::Update(args) => run_update(args, global),
        MemberCommands::Passwd(args) => run_passwd(args, global),
        MemberCommands::Rm(args) => run_rm(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let dir = helpers::open_directory(global)?;
    let config = Config::load(Some(&dir));

    let mut users = store::all_users(&dir).map_err(|e| miette::miette!("{}", e))?;

    if let Some(interest) = &args.interest {
        users.retain(|u| u.interests.iter().any(|n| n.eq_ignore_ascii_case(interest)));
    }
    if let Some(search) = &args.search {
        let needle = search.to_lowercase();
        users.retain(|u| {
            u.name.to_lowercase().contains(&needle) || u.email.to_lowercase().contains(&needle)
        });
    }

    if args.count {
        println!("{}", users.len());
        return Ok(());
    }

    match helpers::effective_format(global, &config) {
        OutputFormat::Yaml => {
            let views: Vec<MemberView> = users.iter().map(MemberView::from).collect();
            print!("{}", serde_yml::to_string(&views).into_diagnostic()?);
        }
        OutputFormat::Json => {
            let views: Vec<MemberView> = users.iter().map(MemberView::from).collect();
            println!("{}", serde_json::to_string_pretty(&views).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for user in &users {
                println!("{}", user.id);
            }
        }
        OutputFormat::Auto | OutputFormat::Table => {
            print_table(&users);
        }
    }
    Ok(())
}

fn print_table(users: &[User]) {
    println!(
        "{:<17} {:<24} {:<28} {}",
        style("ID").bold(),
        style("NAME").bold(),
        style("EMAIL").bold(),
        style("INTERESTS").bold()
    );
    for user in users {
        println!(
            "{:<17} {:<24} {:<28} {}",
            helpers::format_short_id(&user.id),
            helpers::truncate_str(&user.name, 24),
            helpers::truncate_str(&user.email, 28),
            user.interests.len()
        );
    }
    println!();
    println!("{} member(s)", users.len());
}

fn find_member(dir: &MemberDirectory, query: &str) -> Result<(std::path::PathBuf, User)> {
    store::find_user(dir, query)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("no member matching '{}'", query))
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let dir = helpers::open_directory(global)?;
    let config = Config::load(Some(&dir));
    let (_, user) = find_member(&dir, &args.id)?;
    let view = MemberView::from(&user);

    match helpers::effective_format(global, &config) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&view).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", view.id),
        _ => print!("{}", serde_yml::to_string(&view).into_diagnostic()?),
    }
    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let dir = helpers::open_directory(global)?;
    let config = Config::load(Some(&dir));
    let (path, _) = find_member(&dir, &args.id)?;

    let status = config.run_editor(&path).into_diagnostic()?;
    if !status.success() {
        return Err(miette::miette!("editor exited with {}", status));
    }

    // Surface problems introduced by the edit right away: first that the
    // record still parses, then that it still matches the schema
    let _: User = crate::yaml::parse_yaml_file(&path)?;
    if let Err(e) = Validator::default().validate_file(&path) {
        println!(
            "{} {} no longer validates:",
            style("!").yellow(),
            path.display()
        );
        return Err(e.into());
    }
    if !global.quiet {
        println!("{} Updated {}", style("✓").green(), path.display());
    }
    Ok(())
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let dir = helpers::open_directory(global)?;

    let params = UpdateUserParams {
        name: args.name,
        email: args.email,
        about: args.about,
        interests: args.interests,
    };
    if params.is_empty() {
        return Err(miette::miette!(
            "nothing to update; pass --name, --email, --about, or --interests"
        ));
    }

    let user = store::update_user(&dir, &args.id, params).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!("{} Updated member {}", style("✓").green(), style(&user.id).bold());
    }
    Ok(())
}

fn run_passwd(args: PasswdArgs, global: &GlobalOpts) -> Result<()> {
    let dir = helpers::open_directory(global)?;

    let password = match args.password {
        Some(p) => p,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("New password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .into_diagnostic()?,
    };

    let user =
        store::change_password(&dir, &args.id, &password).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!(
            "{} Password updated for {}",
            style("✓").green(),
            style(&user.id).bold()
        );
    }
    Ok(())
}

fn run_rm(args: RmArgs, global: &GlobalOpts) -> Result<()> {
    let dir = helpers::open_directory(global)?;
    let (_, user) = find_member(&dir, &args.id)?;

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Remove member {} ({})?", user.id, user.email))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("{} Aborted", style("!").yellow());
            return Ok(());
        }
    }

    let removed = store::delete_user(&dir, &args.id).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!(
            "{} Removed member {} ({})",
            style("✓").green(),
            style(&removed.id).bold(),
            removed.email
        );
    }
    Ok(())
}
