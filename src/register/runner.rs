//! Interactive registration wizard
//!
//! Drives the state machine with themed prompts. Each step owns a slice of
//! the draft and its own validation rules: the step loops until its form
//! validator passes, merges its patch, and only then requests a forward
//! transition. Choosing "Previous" discards the step's edits and retreats.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Password, Select};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::core::directory::MemberDirectory;
use crate::core::store;
use crate::entities::user::{User, MIN_PASSWORD_LEN};
use crate::forms::{self, Validations, Validity};
use crate::register::{DraftPatch, RegistrationDraft, RegistrationStep, RegistrationWizard};

/// Minimum interests required to continue past the interests step
pub const MIN_INTERESTS: usize = 3;

/// Fields owned by the account step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountField {
    Name,
    Email,
    Password,
}

/// The account step's local form shape
#[derive(Debug, Clone)]
pub struct AccountForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Validation rules for the account step
pub fn account_form_validator(form: &AccountForm) -> Validations<AccountField> {
    let mut out = Validations::new();

    let name = if form.name.trim().is_empty() {
        Validity::invalid("Name is required")
    } else {
        Validity::valid()
    };

    let email = if form.email.is_empty() {
        Validity::invalid("Please provide your email")
    } else if !forms::is_valid_email(&form.email) {
        Validity::invalid("Invalid email")
    } else {
        Validity::valid()
    };

    let password = if form.password.len() < MIN_PASSWORD_LEN {
        Validity::invalid(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters."
        ))
    } else {
        Validity::valid()
    };

    out.insert(AccountField::Name, name);
    out.insert(AccountField::Email, email);
    out.insert(AccountField::Password, password);
    out
}

/// Fields owned by the summary step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryField {
    About,
}

/// The summary step's local form shape
#[derive(Debug, Clone)]
pub struct SummaryForm {
    pub about: String,
}

/// Validation rules for the summary step
pub fn summary_form_validator(form: &SummaryForm) -> Validations<SummaryField> {
    let mut out = Validations::new();
    let about = if form.about.trim().is_empty() {
        Validity::invalid("Tell the community a little about yourself")
    } else {
        Validity::valid()
    };
    out.insert(SummaryField::About, about);
    out
}

/// What a step asked for after collecting its slice
enum StepOutcome {
    Continue(DraftPatch),
    Previous,
}

/// Interactive wizard over a membership directory
pub struct WizardRunner<'a> {
    dir: &'a MemberDirectory,
    theme: ColorfulTheme,
}

impl<'a> WizardRunner<'a> {
    /// Create a runner against the given directory
    pub fn new(dir: &'a MemberDirectory) -> Self {
        Self {
            dir,
            theme: ColorfulTheme::default(),
        }
    }

    /// Run the wizard to completion, returning the created member
    pub fn run(&self) -> Result<User> {
        println!();
        println!(
            "{} Join the community - {} quick steps",
            style("◆").cyan(),
            RegistrationStep::all().len()
        );
        println!("{}", style("─".repeat(50)).dim());

        let mut wizard = RegistrationWizard::new();

        loop {
            self.print_step_header(wizard.step());

            let outcome = match wizard.step() {
                RegistrationStep::Account => self.prompt_account(wizard.draft())?,
                RegistrationStep::ProfileImage => self.prompt_photo(wizard.draft())?,
                RegistrationStep::Interests => self.prompt_interests(wizard.draft())?,
                RegistrationStep::Summary => self.prompt_summary(wizard.draft())?,
            };

            match outcome {
                StepOutcome::Previous => {
                    wizard.retreat().into_diagnostic()?;
                }
                StepOutcome::Continue(patch) => {
                    wizard.merge(patch);
                    if wizard.step().is_last() {
                        break;
                    }
                    wizard.advance().into_diagnostic()?;
                }
            }
        }

        let params = wizard.into_params().into_diagnostic()?;
        let user =
            store::create_user(self.dir, params).map_err(|e| miette::miette!("{}", e))?;

        println!();
        println!(
            "{} Welcome aboard, {}!",
            style("✓").green(),
            style(&user.name).bold()
        );
        Ok(user)
    }

    fn print_step_header(&self, step: RegistrationStep) {
        println!();
        println!(
            "{} Step {}/{}: {}",
            style("◆").cyan(),
            step.position() + 1,
            RegistrationStep::all().len(),
            style(step).bold()
        );
    }

    fn print_field_errors<K: Eq + std::hash::Hash>(
        &self,
        outcome: &Validations<K>,
        fields: &[(K, &str)],
    ) where
        K: Copy,
    {
        for (field, label) in fields {
            if let Some(validity) = outcome.get(field) {
                if let Some(error) = &validity.error {
                    println!("{} {}: {}", style("!").yellow(), label, error);
                }
            }
        }
    }

    fn prompt_account(&self, draft: &RegistrationDraft) -> Result<StepOutcome> {
        loop {
            let name: String = Input::with_theme(&self.theme)
                .with_prompt("Name")
                .with_initial_text(draft.name.clone().unwrap_or_default())
                .allow_empty(true)
                .interact_text()
                .into_diagnostic()?;

            let email: String = Input::with_theme(&self.theme)
                .with_prompt("Email")
                .with_initial_text(draft.email.clone().unwrap_or_default())
                .allow_empty(true)
                .interact_text()
                .into_diagnostic()?;

            let password = Password::with_theme(&self.theme)
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .allow_empty_password(true)
                .interact()
                .into_diagnostic()?;

            let form = AccountForm {
                name,
                email,
                password,
            };
            let outcome = forms::validate(account_form_validator, &form);
            if outcome.values().all(|v| v.is_valid) {
                return Ok(StepOutcome::Continue(DraftPatch {
                    name: Some(form.name.trim().to_string()),
                    email: Some(form.email.trim().to_string()),
                    password: Some(form.password),
                    ..Default::default()
                }));
            }

            self.print_field_errors(
                &outcome,
                &[
                    (AccountField::Name, "Name"),
                    (AccountField::Email, "Email"),
                    (AccountField::Password, "Password"),
                ],
            );
        }
    }

    fn prompt_photo(&self, draft: &RegistrationDraft) -> Result<StepOutcome> {
        let current = draft
            .photo
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        let path: String = Input::with_theme(&self.theme)
            .with_prompt("Profile image path (leave empty to skip)")
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;

        let patch = DraftPatch {
            photo: if path.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(path.trim()))
            },
            ..Default::default()
        };

        self.navigate(patch)
    }

    fn prompt_interests(&self, draft: &RegistrationDraft) -> Result<StepOutcome> {
        let mut candidates: Vec<String> = store::all_interests(self.dir)
            .map_err(|e| miette::miette!("{}", e))?
            .into_iter()
            .map(|interest| interest.name)
            .collect();
        for name in draft.interests.iter().flatten() {
            if !candidates.iter().any(|c| c.eq_ignore_ascii_case(name)) {
                candidates.push(name.clone());
            }
        }
        candidates.sort();

        loop {
            // Freeform additions first, then pick from the full list
            loop {
                let extra: String = Input::with_theme(&self.theme)
                    .with_prompt("Add an interest (leave empty to choose from the list)")
                    .allow_empty(true)
                    .interact_text()
                    .into_diagnostic()?;
                let extra = extra.trim().to_string();
                if extra.is_empty() {
                    break;
                }
                if !candidates.iter().any(|c| c.eq_ignore_ascii_case(&extra)) {
                    candidates.push(extra);
                    candidates.sort();
                }
            }

            let selected: Vec<bool> = candidates
                .iter()
                .map(|c| {
                    draft
                        .interests
                        .iter()
                        .flatten()
                        .any(|n| n.eq_ignore_ascii_case(c))
                })
                .collect();

            let picked = MultiSelect::with_theme(&self.theme)
                .with_prompt(format!("Select at least {MIN_INTERESTS} interests"))
                .items(&candidates)
                .defaults(&selected)
                .interact()
                .into_diagnostic()?;

            if picked.len() >= MIN_INTERESTS {
                let interests: Vec<String> =
                    picked.into_iter().map(|i| candidates[i].clone()).collect();
                return self.navigate(DraftPatch {
                    interests: Some(interests),
                    ..Default::default()
                });
            }

            println!(
                "{} Add at least {} topics that interest you",
                style("!").yellow(),
                MIN_INTERESTS
            );
        }
    }

    fn prompt_summary(&self, draft: &RegistrationDraft) -> Result<StepOutcome> {
        println!(
            "  {} {}",
            style("Name:").dim(),
            draft.name.as_deref().unwrap_or("-")
        );
        println!(
            "  {} {}",
            style("Email:").dim(),
            draft.email.as_deref().unwrap_or("-")
        );
        println!(
            "  {} {}",
            style("Interests:").dim(),
            draft
                .interests
                .as_deref()
                .map(|i| i.join(", "))
                .unwrap_or_else(|| "-".to_string())
        );

        loop {
            let about: String = Input::with_theme(&self.theme)
                .with_prompt("About you")
                .with_initial_text(draft.about.clone().unwrap_or_default())
                .allow_empty(true)
                .interact_text()
                .into_diagnostic()?;

            let form = SummaryForm { about };
            let outcome = forms::validate(summary_form_validator, &form);
            if outcome.values().all(|v| v.is_valid) {
                let patch = DraftPatch {
                    about: Some(form.about.trim().to_string()),
                    ..Default::default()
                };
                let choices = &["Create account", "Previous"];
                let choice = Select::with_theme(&self.theme)
                    .items(choices)
                    .default(0)
                    .interact()
                    .into_diagnostic()?;
                return Ok(if choice == 0 {
                    StepOutcome::Continue(patch)
                } else {
                    StepOutcome::Previous
                });
            }

            self.print_field_errors(&outcome, &[(SummaryField::About, "About")]);
        }
    }

    /// Offer Continue/Previous after a step collected its slice
    fn navigate(&self, patch: DraftPatch) -> Result<StepOutcome> {
        let choices = &["Continue", "Previous"];
        let choice = Select::with_theme(&self.theme)
            .items(choices)
            .default(0)
            .interact()
            .into_diagnostic()?;

        Ok(if choice == 0 {
            StepOutcome::Continue(patch)
        } else {
            StepOutcome::Previous
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str, email: &str, password: &str) -> AccountForm {
        AccountForm {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_account_validator_accepts_complete_form() {
        let outcome = account_form_validator(&account("Ada", "ada@example.com", "secret1"));
        assert!(outcome.values().all(|v| v.is_valid));
    }

    #[test]
    fn test_account_validator_flags_each_field() {
        let outcome = account_form_validator(&account("", "bad-email", "12345"));
        assert_eq!(
            outcome[&AccountField::Name].error.as_deref(),
            Some("Name is required")
        );
        assert_eq!(
            outcome[&AccountField::Email].error.as_deref(),
            Some("Invalid email")
        );
        assert!(outcome[&AccountField::Password]
            .error
            .as_deref()
            .unwrap()
            .contains("at least 6"));
    }

    #[test]
    fn test_account_validator_distinguishes_empty_email() {
        let outcome = account_form_validator(&account("Ada", "", "secret1"));
        assert_eq!(
            outcome[&AccountField::Email].error.as_deref(),
            Some("Please provide your email")
        );
    }

    #[test]
    fn test_summary_validator_requires_about() {
        let empty = summary_form_validator(&SummaryForm {
            about: "  ".to_string(),
        });
        assert!(!empty[&SummaryField::About].is_valid);

        let filled = summary_form_validator(&SummaryForm {
            about: "Analyst".to_string(),
        });
        assert!(filled[&SummaryField::About].is_valid);
    }
}
