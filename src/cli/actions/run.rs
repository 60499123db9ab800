use crate::cli::actions::{Action, login, logout, status};
use anyhow::Result;

/// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(args) => login::execute(args).await,
        Action::Status(args) => status::execute(&args),
        Action::Logout(args) => logout::execute(&args),
    }
}
