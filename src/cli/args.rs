//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs,
    init::InitArgs,
    interest::InterestCommands,
    login::LoginArgs,
    member::MemberCommands,
    register::RegisterArgs,
    validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "mingle")]
#[command(author, version, about = "Mingle membership toolkit")]
#[command(long_about = "A toolkit for managing a membership directory as plain text files: interactive registration, sign-in, and interest groups.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Directory root (default: auto-detect by finding .mingle/)
    #[arg(long, global = true)]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new membership directory
    Init(InitArgs),

    /// Register a new member (interactive wizard, or flags for scripting)
    Register(RegisterArgs),

    /// Sign in with email and password
    Login(LoginArgs),

    /// Clear the signed-in session
    Logout,

    /// Show the signed-in member
    Whoami,

    /// Member management
    #[command(subcommand)]
    Member(MemberCommands),

    /// Interest management
    #[command(subcommand)]
    Interest(InterestCommands),

    /// Validate directory records against schemas
    Validate(ValidateArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically pick based on context (table for list, yaml for show)
    #[default]
    Auto,
    /// Aligned columns for reading
    Table,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// Just IDs, one per line
    Id,
}
