use crate::client::FileStorage;
use crate::session::is_authenticated;
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug)]
pub struct Args {
    pub storage_path: PathBuf,
}

/// Reports whether both tokens are stored. Token values are never printed.
///
/// # Errors
/// Returns an error if the session file cannot be read.
pub fn execute(args: &Args) -> Result<()> {
    let storage = FileStorage::new(&args.storage_path);
    let signed_in = is_authenticated(&storage)
        .with_context(|| format!("reading {}", args.storage_path.display()))?;

    if signed_in {
        println!("Signed in ({})", args.storage_path.display());
    } else {
        println!("Not signed in");
    }

    Ok(())
}
