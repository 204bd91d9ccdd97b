//! Registration wizard state machine
//!
//! An ordered sequence of named steps plus an accumulating draft record.
//! The wizard owns both the current step and the draft; steps read a slice
//! and write back only through [`RegistrationWizard::merge`] and the
//! explicit [`advance`](RegistrationWizard::advance) /
//! [`retreat`](RegistrationWizard::retreat) transitions. Navigating past
//! either boundary is a typed error, never a silent no-op.

pub mod runner;

use std::path::PathBuf;
use thiserror::Error;

use crate::entities::user::CreateUserParams;

/// The ordered steps of the registration wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationStep {
    /// Account details: name, email, password
    Account,
    /// Optional profile image
    ProfileImage,
    /// Interest selection
    Interests,
    /// Review, biography, and final submission
    Summary,
}

impl RegistrationStep {
    /// All steps, in wizard order
    pub fn all() -> &'static [RegistrationStep] {
        &[
            RegistrationStep::Account,
            RegistrationStep::ProfileImage,
            RegistrationStep::Interests,
            RegistrationStep::Summary,
        ]
    }

    /// The designated initial step
    pub fn first() -> Self {
        RegistrationStep::Account
    }

    /// The designated terminal step
    pub fn last() -> Self {
        RegistrationStep::Summary
    }

    /// Zero-based position in the step ordering
    pub fn position(&self) -> usize {
        match self {
            RegistrationStep::Account => 0,
            RegistrationStep::ProfileImage => 1,
            RegistrationStep::Interests => 2,
            RegistrationStep::Summary => 3,
        }
    }

    /// The step one position forward, if any
    pub fn next(&self) -> Option<Self> {
        Self::all().get(self.position() + 1).copied()
    }

    /// The step one position backward, if any
    pub fn previous(&self) -> Option<Self> {
        self.position().checked_sub(1).and_then(|p| Self::all().get(p)).copied()
    }

    /// Whether this is the initial step
    pub fn is_first(&self) -> bool {
        *self == Self::first()
    }

    /// Whether this is the terminal step
    pub fn is_last(&self) -> bool {
        *self == Self::last()
    }
}

impl Default for RegistrationStep {
    fn default() -> Self {
        Self::first()
    }
}

impl std::fmt::Display for RegistrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationStep::Account => write!(f, "Account"),
            RegistrationStep::ProfileImage => write!(f, "Profile image"),
            RegistrationStep::Interests => write!(f, "Interests"),
            RegistrationStep::Summary => write!(f, "Summary"),
        }
    }
}

/// Errors from wizard navigation and the terminal handoff
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("cannot go back: already at the first step")]
    AtInitialStep,

    #[error("cannot continue: already at the last step")]
    AtTerminalStep,

    #[error("registration is only submitted from the {} step (currently at {current})", RegistrationStep::last())]
    NotAtFinalStep { current: RegistrationStep },

    #[error("registration is incomplete: missing {0}")]
    MissingField(&'static str),
}

/// The draft record accumulated across wizard steps.
///
/// Also the shape of a per-step partial update: fields a step leaves as
/// `None` are preserved by [`merge`](Self::merge), fields it sets are
/// overwritten wholly (lists replace, they do not union).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Collected by the profile-image step; not part of the handoff payload
    pub photo: Option<PathBuf>,
    pub interests: Option<Vec<String>>,
    pub about: Option<String>,
}

/// A partial update contributed by one step
pub type DraftPatch = RegistrationDraft;

impl RegistrationDraft {
    /// Shallow-merge a partial update into this draft, returning the new
    /// draft. Present keys overwrite; absent keys are preserved.
    pub fn merge(mut self, patch: DraftPatch) -> Self {
        if patch.name.is_some() {
            self.name = patch.name;
        }
        if patch.email.is_some() {
            self.email = patch.email;
        }
        if patch.password.is_some() {
            self.password = patch.password;
        }
        if patch.photo.is_some() {
            self.photo = patch.photo;
        }
        if patch.interests.is_some() {
            self.interests = patch.interests;
        }
        if patch.about.is_some() {
            self.about = patch.about;
        }
        self
    }
}

/// The wizard: exactly one current step, one accumulating draft
#[derive(Debug, Clone, Default)]
pub struct RegistrationWizard {
    step: RegistrationStep,
    draft: RegistrationDraft,
}

impl RegistrationWizard {
    /// Start a wizard at the initial step with an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// The current step
    pub fn step(&self) -> RegistrationStep {
        self.step
    }

    /// The accumulated draft
    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// Merge a step's partial update into the draft
    pub fn merge(&mut self, patch: DraftPatch) {
        self.draft = std::mem::take(&mut self.draft).merge(patch);
    }

    /// Move exactly one step forward
    pub fn advance(&mut self) -> Result<RegistrationStep, WizardError> {
        self.step = self.step.next().ok_or(WizardError::AtTerminalStep)?;
        Ok(self.step)
    }

    /// Move exactly one step backward
    pub fn retreat(&mut self) -> Result<RegistrationStep, WizardError> {
        self.step = self.step.previous().ok_or(WizardError::AtInitialStep)?;
        Ok(self.step)
    }

    /// Convert the completed draft into the handoff payload.
    ///
    /// Defined only at the terminal step; the payload carries exactly the
    /// five creation keys (a collected profile image stays local).
    pub fn into_params(&self) -> Result<CreateUserParams, WizardError> {
        if !self.step.is_last() {
            return Err(WizardError::NotAtFinalStep { current: self.step });
        }

        let draft = &self.draft;
        Ok(CreateUserParams {
            name: draft.name.clone().ok_or(WizardError::MissingField("name"))?,
            email: draft.email.clone().ok_or(WizardError::MissingField("email"))?,
            password: draft
                .password
                .clone()
                .ok_or(WizardError::MissingField("password"))?,
            about: draft.about.clone().ok_or(WizardError::MissingField("about"))?,
            interests: draft.interests.clone().unwrap_or_default(),
        })
    }
}
