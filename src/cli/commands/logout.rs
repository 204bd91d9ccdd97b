//! `mingle logout` command - Clear the signed-in session

use console::style;
use miette::Result;

use crate::auth::SessionStore;
use crate::cli::{helpers, GlobalOpts};

pub fn run(global: &GlobalOpts) -> Result<()> {
    let dir = helpers::open_directory(global)?;
    let store = SessionStore::new(dir.session_path());

    let had_session = store
        .load()
        .map_err(|e| miette::miette!("{}", e))?
        .is_some();
    store.clear().map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        if had_session {
            println!("{} Signed out", style("✓").green());
        } else {
            println!("{} No active session", style("!").yellow());
        }
    }
    Ok(())
}
