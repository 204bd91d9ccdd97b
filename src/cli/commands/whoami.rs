//! `mingle whoami` command - Show the signed-in member

use console::style;
use miette::Result;

use crate::auth::SessionStore;
use crate::cli::{helpers, GlobalOpts};
use crate::core::store;

pub fn run(global: &GlobalOpts) -> Result<()> {
    let dir = helpers::open_directory(global)?;

    let session = SessionStore::new(dir.session_path())
        .load()
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("not signed in; run 'mingle login' first"))?;

    let id = session.id.to_string();
    let (_, user) = store::find_user(&dir, &id)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("session member {} no longer exists", id))?;

    println!(
        "{} {} {}",
        style(&user.id).dim(),
        style(&user.name).bold(),
        format!("<{}>", user.email)
    );
    if global.verbose {
        println!("  signed in since {}", session.created.to_rfc3339());
    }
    Ok(())
}
