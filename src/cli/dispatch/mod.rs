//! Maps validated CLI matches to an `Action`.

use crate::cli::actions::{Action, login, logout, status};
use crate::cli::commands::{
    ARG_API_URL, ARG_APP_URL, ARG_FIELD, ARG_NO_PROMPT, ARG_REDIRECT_ON_FAILURE, ARG_STORAGE,
    ARG_TIMEOUT, ARG_VALIDATE,
};
use crate::client::FileStorage;
use crate::config::{AppConfig, RedirectPolicy};
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use std::{path::PathBuf, time::Duration};
use url::Url;

/// Global arguments are propagated down, so the deepest matches see them all.
#[must_use]
pub fn leaf(matches: &ArgMatches) -> &ArgMatches {
    match matches.subcommand() {
        Some((_, sub)) => leaf(sub),
        None => matches,
    }
}

fn storage_path(matches: &ArgMatches) -> Result<PathBuf> {
    matches
        .get_one::<PathBuf>(ARG_STORAGE)
        .cloned()
        .or_else(FileStorage::default_path)
        .context("no --storage given and no local data directory available")
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let storage_path = storage_path(leaf(matches))?;

    match matches.subcommand() {
        Some(("login", sub)) => login_args(sub, storage_path).map(Action::Login),
        Some(("status", _)) => Ok(Action::Status(status::Args { storage_path })),
        Some(("logout", _)) => Ok(Action::Logout(logout::Args { storage_path })),
        Some((name, _)) => Err(anyhow!("unknown command: {name}")),
        None => Err(anyhow!("missing command")),
    }
}

fn login_args(matches: &ArgMatches, storage_path: PathBuf) -> Result<login::Args> {
    let api_url = matches
        .get_one::<String>(ARG_API_URL)
        .context("missing required argument: --api-url")?;
    Url::parse(api_url).with_context(|| format!("invalid --api-url: {api_url}"))?;

    let app_url = matches
        .get_one::<String>(ARG_APP_URL)
        .context("missing required argument: --app-url")?;
    let app_url = Url::parse(app_url).with_context(|| format!("invalid --app-url: {app_url}"))?;

    let mut config = AppConfig::new(api_url);
    config.timeout = Duration::from_secs(
        matches
            .get_one::<u64>(ARG_TIMEOUT)
            .copied()
            .unwrap_or(config.timeout.as_secs()),
    );
    config.validate = matches.get_flag(ARG_VALIDATE);
    if matches.get_flag(ARG_REDIRECT_ON_FAILURE) {
        config.redirect_policy = RedirectPolicy::Always;
    }

    let fields = matches
        .get_many::<(String, String)>(ARG_FIELD)
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    Ok(login::Args {
        config,
        app_url,
        storage_path,
        fields,
        prompt: !matches.get_flag(ARG_NO_PROMPT),
    })
}
