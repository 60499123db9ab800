//! # Keygate (login form session flow)
//!
//! `keygate` implements the client side of a sign-in form: it keeps the value of
//! every form field, submits the credentials to the login endpoint, checks the
//! response and stores the returned session tokens for later requests.
//!
//! ## Flow
//!
//! 1. The host renders one input per [`form::FieldDescriptor`] and forwards every
//!    change to a [`form::FieldStore`].
//! 2. On submit, [`session::Submitter::submit`] projects the snapshot onto
//!    `{email, password}` and sends `POST {api}/v1.1/login` with a JSON body.
//! 3. A 2xx response must carry `{"jwt", "refresh"}`; both are written to durable
//!    storage under the keys `jwt` and `refresh`.
//! 4. The host navigates to `/`.
//!
//! Network failures, non-2xx statuses and malformed bodies are reported as
//! distinct [`session::SubmitError`] variants and, by default, do not navigate.
//! Only one submission can be in flight per submitter.
//!
//! ## Hosts
//!
//! - **Browser** (`wasm32`): a Leptos form backed by `fetch`, `localStorage` and
//!   `window.location` (see `web`).
//! - **Terminal**: the `keygate` binary backed by `reqwest`, a JSON session file
//!   and a console navigator (see [`cli`] and [`client`]).

pub mod config;
pub mod form;
pub mod session;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod client;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(GIT_COMMIT_HASH.len() >= 7);
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with("keygate/"));
        assert!(APP_USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
