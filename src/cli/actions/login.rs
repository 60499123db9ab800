//! `keygate login`: the terminal host for the login form. It fills one field per
//! descriptor, from `--field` values first and then by prompting, submits the
//! snapshot and reports where the form would redirect to.

use crate::client::{ConsoleNavigator, FileStorage, HttpTransport};
use crate::config::AppConfig;
use crate::form::{FieldStore, login_fields};
use crate::session::Submitter;
use anyhow::{Context, Result};
use std::{fmt, path::PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;
use url::Url;

pub struct Args {
    pub config: AppConfig,
    pub app_url: Url,
    pub storage_path: PathBuf,
    pub fields: Vec<(String, String)>,
    pub prompt: bool,
}

// Field values may hold the password.
impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field_ids: Vec<&str> = self.fields.iter().map(|(id, _)| id.as_str()).collect();
        f.debug_struct("Args")
            .field("config", &self.config)
            .field("app_url", &self.app_url.as_str())
            .field("storage_path", &self.storage_path)
            .field("fields", &field_ids)
            .field("prompt", &self.prompt)
            .finish()
    }
}

/// Applies `--field` values to the store.
///
/// # Errors
/// Returns an error naming the first id that is not a form field.
pub fn apply_fields(store: &mut FieldStore, fields: &[(String, String)]) -> Result<()> {
    for (id, value) in fields {
        store
            .set_value(id, value.as_str())
            .with_context(|| format!("--field {id}=..."))?;
    }
    Ok(())
}

/// Prompts for every field that is still empty, in descriptor order. End of
/// input leaves the remaining fields empty.
///
/// # Errors
/// Returns an error if reading input or writing the prompt fails.
pub async fn prompt_missing<R, W>(store: &mut FieldStore, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let missing: Vec<(String, String)> = store
        .descriptors()
        .iter()
        .filter(|descriptor| store.get_value(&descriptor.id).is_ok_and(str::is_empty))
        .map(|descriptor| (descriptor.id.clone(), descriptor.label.clone()))
        .collect();

    for (id, label) in missing {
        output.write_all(format!("{label}: ").as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            debug!(field = %id, "input closed before all fields were filled");
            break;
        };
        store.set_value(&id, line.trim_end_matches('\r'))?;
    }

    Ok(())
}

/// Handle the login action
///
/// # Errors
/// Returns an error if the form cannot be filled or the login fails.
pub async fn execute(args: Args) -> Result<()> {
    let mut store = FieldStore::new(login_fields())?;
    apply_fields(&mut store, &args.fields)?;

    if args.prompt {
        let mut stderr = tokio::io::stderr();
        prompt_missing(&mut store, BufReader::new(tokio::io::stdin()), &mut stderr).await?;
    }

    let transport = HttpTransport::new(args.config.timeout)?;
    let storage = FileStorage::new(&args.storage_path);
    let navigator = ConsoleNavigator::new(args.app_url);
    let submitter = Submitter::new(&args.config, transport, storage, &navigator);

    let result = submitter.submit(&store.snapshot()).await;

    if let Some(target) = navigator.last_target() {
        println!("Redirect: {target}");
    }

    result.with_context(|| format!("login to {} failed", submitter.login_url()))?;
    println!("Signed in, session stored in {}", args.storage_path.display());

    Ok(())
}
