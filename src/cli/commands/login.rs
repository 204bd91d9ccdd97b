//! `mingle login` command - Sign in and persist the session

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Password};
use miette::{IntoDiagnostic, Result};

use crate::auth::SessionStore;
use crate::cli::{helpers, GlobalOpts};
use crate::core::store;
use crate::forms::{self, Validations, Validity};

/// Fields of the login form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginField {
    Email,
    Password,
}

/// The login form shape
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Validation rules for the login form
pub fn login_form_validator(form: &LoginForm) -> Validations<LoginField> {
    let mut out = Validations::new();

    let email = if form.email.is_empty() {
        Validity::invalid("Please provide your email")
    } else if !forms::is_valid_email(&form.email) {
        Validity::invalid("Invalid email")
    } else {
        Validity::valid()
    };

    let password = if form.password.is_empty() {
        Validity::invalid("Please provide your password")
    } else {
        Validity::valid()
    };

    out.insert(LoginField::Email, email);
    out.insert(LoginField::Password, password);
    out
}

#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    /// Email address (prompted when omitted)
    #[arg(long)]
    pub email: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

pub fn run(args: LoginArgs, global: &GlobalOpts) -> Result<()> {
    let dir = helpers::open_directory(global)?;

    let form = match (args.email, args.password) {
        (Some(email), Some(password)) => {
            let form = LoginForm { email, password };
            let outcome = forms::validate(login_form_validator, &form);
            let mut errors: Vec<String> = outcome
                .values()
                .filter_map(|v| v.error.clone())
                .collect();
            errors.sort();
            if !errors.is_empty() {
                return Err(miette::miette!("{}", errors.join("; ")));
            }
            form
        }
        (email, password) => prompt_login(email, password)?,
    };

    let session =
        store::sign_in(&dir, &form.email, &form.password).map_err(|e| miette::miette!("{}", e))?;

    SessionStore::new(dir.session_path())
        .persist(&session)
        .map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Signed in as {}",
            style("✓").green(),
            style(&form.email).bold()
        );
    }
    if global.verbose {
        println!("  session: {}", style(&session.token).dim());
    }
    Ok(())
}

/// Prompt for credentials until the form validates
fn prompt_login(preset_email: Option<String>, preset_password: Option<String>) -> Result<LoginForm> {
    let theme = ColorfulTheme::default();

    loop {
        let email: String = match &preset_email {
            Some(e) => e.clone(),
            None => Input::with_theme(&theme)
                .with_prompt("Email")
                .allow_empty(true)
                .interact_text()
                .into_diagnostic()?,
        };
        let password: String = match &preset_password {
            Some(p) => p.clone(),
            None => Password::with_theme(&theme)
                .with_prompt("Password")
                .allow_empty_password(true)
                .interact()
                .into_diagnostic()?,
        };

        let form = LoginForm { email, password };
        let outcome = forms::validate(login_form_validator, &form);
        if outcome.values().all(|v| v.is_valid) {
            return Ok(form);
        }

        for (field, label) in [(LoginField::Email, "Email"), (LoginField::Password, "Password")] {
            if let Some(error) = outcome.get(&field).and_then(|v| v.error.as_deref()) {
                println!("{} {}: {}", style("!").yellow(), label, error);
            }
        }

        // Flag-provided values cannot be corrected interactively
        let email_stuck = preset_email.is_some() && !outcome[&LoginField::Email].is_valid;
        let password_stuck = preset_password.is_some() && !outcome[&LoginField::Password].is_valid;
        if email_stuck || password_stuck {
            return Err(miette::miette!("invalid login details"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_validator_accepts_complete_form() {
        let outcome = login_form_validator(&LoginForm {
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
        });
        assert!(outcome.values().all(|v| v.is_valid));
    }

    #[test]
    fn test_login_validator_requires_both_fields() {
        let outcome = login_form_validator(&LoginForm {
            email: String::new(),
            password: String::new(),
        });
        assert_eq!(
            outcome[&LoginField::Email].error.as_deref(),
            Some("Please provide your email")
        );
        assert_eq!(
            outcome[&LoginField::Password].error.as_deref(),
            Some("Please provide your password")
        );
    }

    #[test]
    fn test_login_validator_rejects_malformed_email() {
        let outcome = login_form_validator(&LoginForm {
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
        });
        assert_eq!(outcome[&LoginField::Email].error.as_deref(), Some("Invalid email"));
        assert!(outcome[&LoginField::Password].is_valid);
    }
}
