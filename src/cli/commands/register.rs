//! `mingle register` command - Register a new member
//!
//! Interactive by default. Providing name, email, password, and about (plus
//! interests) drives the same wizard without prompts, for scripted use.

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::{helpers, GlobalOpts};
use crate::core::directory::MemberDirectory;
use crate::core::store;
use crate::entities::user::User;
use crate::forms;
use crate::register::runner::{
    account_form_validator, summary_form_validator, AccountForm, SummaryForm, WizardRunner,
    MIN_INTERESTS,
};
use crate::register::{DraftPatch, RegistrationWizard};

#[derive(clap::Args, Debug)]
pub struct RegisterArgs {
    /// Display name (providing all required flags skips the prompts)
    #[arg(long)]
    pub name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Password (at least 6 characters)
    #[arg(long)]
    pub password: Option<String>,

    /// Short biography
    #[arg(long)]
    pub about: Option<String>,

    /// Interests (comma-separated, at least 3)
    #[arg(long, value_delimiter = ',')]
    pub interests: Vec<String>,

    /// Profile image path
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

pub fn run(args: RegisterArgs, global: &GlobalOpts) -> Result<()> {
    let dir = helpers::open_directory(global)?;

    let user = match (&args.name, &args.email, &args.password, &args.about) {
        (Some(_), Some(_), Some(_), Some(_)) => run_scripted(&dir, &args)?,
        _ => WizardRunner::new(&dir).run()?,
    };

    if !global.quiet {
        println!(
            "{} Created member {} ({})",
            style("✓").green(),
            style(&user.id).bold(),
            user.email
        );
        println!("Sign in with {}", style("mingle login").yellow());
    }
    Ok(())
}

/// Drive the wizard from flags, enforcing the same per-step gates the
/// interactive runner applies
fn run_scripted(dir: &MemberDirectory, args: &RegisterArgs) -> Result<User> {
    let mut wizard = RegistrationWizard::new();

    // Account step
    let account = AccountForm {
        name: args.name.clone().unwrap_or_default(),
        email: args.email.clone().unwrap_or_default(),
        password: args.password.clone().unwrap_or_default(),
    };
    bail_on_invalid(forms::validate(account_form_validator, &account).values())?;
    wizard.merge(DraftPatch {
        name: Some(account.name.trim().to_string()),
        email: Some(account.email.trim().to_string()),
        password: Some(account.password),
        ..Default::default()
    });
    wizard.advance().into_diagnostic()?;

    // Profile image step
    wizard.merge(DraftPatch {
        photo: args.photo.clone(),
        ..Default::default()
    });
    wizard.advance().into_diagnostic()?;

    // Interests step
    let interests: Vec<String> = args
        .interests
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if interests.len() < MIN_INTERESTS {
        return Err(miette::miette!(
            "Add at least {} topics that interest you (got {})",
            MIN_INTERESTS,
            interests.len()
        ));
    }
    wizard.merge(DraftPatch {
        interests: Some(interests),
        ..Default::default()
    });
    wizard.advance().into_diagnostic()?;

    // Summary step
    let summary = SummaryForm {
        about: args.about.clone().unwrap_or_default(),
    };
    bail_on_invalid(forms::validate(summary_form_validator, &summary).values())?;
    wizard.merge(DraftPatch {
        about: Some(summary.about.trim().to_string()),
        ..Default::default()
    });

    let params = wizard.into_params().into_diagnostic()?;
    store::create_user(dir, params).map_err(|e| miette::miette!("{}", e))
}

fn bail_on_invalid<'a, I>(outcome: I) -> Result<()>
where
    I: Iterator<Item = &'a forms::Validity>,
{
    let errors: Vec<String> = outcome
        .filter_map(|v| v.error.clone())
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(miette::miette!("{}", errors.join("; ")))
    }
}
