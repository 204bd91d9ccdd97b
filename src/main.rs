use clap::Parser;
use miette::Result;
use mingle::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    // This is standard practice for CLI tools that output to stdout.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .width(1000)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => mingle::cli::commands::init::run(args),
        Commands::Register(args) => mingle::cli::commands::register::run(args, &global),
        Commands::Login(args) => mingle::cli::commands::login::run(args, &global),
        Commands::Logout => mingle::cli::commands::logout::run(&global),
        Commands::Whoami => mingle::cli::commands::whoami::run(&global),
        Commands::Member(cmd) => mingle::cli::commands::member::run(cmd, &global),
        Commands::Interest(cmd) => mingle::cli::commands::interest::run(cmd, &global),
        Commands::Validate(args) => mingle::cli::commands::validate::run(args, &global),
        Commands::Completions(args) => mingle::cli::commands::completions::run(args),
    }
}
