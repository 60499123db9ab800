use crate::client::FileStorage;
use crate::session::clear_tokens;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub storage_path: PathBuf,
}

/// Removes `jwt` and `refresh` from the session file; other keys stay.
///
/// # Errors
/// Returns an error if the session file cannot be rewritten.
pub fn execute(args: &Args) -> Result<()> {
    let storage = FileStorage::new(&args.storage_path);
    clear_tokens(&storage)
        .with_context(|| format!("clearing {}", args.storage_path.display()))?;

    info!(path = %args.storage_path.display(), "session tokens removed");
    println!("Signed out");

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::{SessionTokens, is_authenticated, persist_tokens};

    #[test]
    fn logout_clears_stored_session() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            storage_path: dir.path().join("session.json"),
        };
        let storage = FileStorage::new(&args.storage_path);
        let tokens = SessionTokens::new("J".to_string(), "R".to_string()).unwrap();
        persist_tokens(&storage, &tokens).unwrap();

        execute(&args).unwrap();

        assert!(!is_authenticated(&storage).unwrap());
    }

    #[test]
    fn logout_without_session_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            storage_path: dir.path().join("missing.json"),
        };

        execute(&args).unwrap();

        assert!(!args.storage_path.exists());
    }
}
