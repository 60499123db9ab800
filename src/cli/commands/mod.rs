pub mod logging;

use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::{
        ValueParser,
        styling::{AnsiColor, Effects, Styles},
    },
};

pub const ARG_STORAGE: &str = "storage";
pub const ARG_API_URL: &str = "api-url";
pub const ARG_APP_URL: &str = "app-url";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_FIELD: &str = "field";
pub const ARG_VALIDATE: &str = "validate";
pub const ARG_REDIRECT_ON_FAILURE: &str = "redirect-on-failure";
pub const ARG_NO_PROMPT: &str = "no-prompt";

/// Parses `id=value`; the value may itself contain `=`.
pub fn validator_field() -> ValueParser {
    ValueParser::from(move |field: &str| -> std::result::Result<(String, String), String> {
        match field.split_once('=') {
            Some((id, value)) if !id.trim().is_empty() => {
                Ok((id.trim().to_string(), value.to_string()))
            }
            _ => Err("expected <field-id>=<value>".to_string()),
        }
    })
}

fn login_command() -> Command {
    Command::new("login")
        .about("Sign in and store the session tokens")
        .arg(
            Arg::new(ARG_API_URL)
                .short('a')
                .long("api-url")
                .help("Base URL of the API, example: http://localhost:5000")
                .env("KEYGATE_API_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_APP_URL)
                .long("app-url")
                .help("Application URL the redirect target is resolved against")
                .env("KEYGATE_APP_URL")
                .default_value("http://localhost:4321"),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .short('t')
                .long("timeout")
                .help("Request timeout in seconds")
                .env("KEYGATE_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_FIELD)
                .short('f')
                .long("field")
                .help("Form field value, example: --field email-address=me@example.com")
                .value_name("ID=VALUE")
                .action(ArgAction::Append)
                .value_parser(validator_field()),
        )
        .arg(
            Arg::new(ARG_VALIDATE)
                .long("validate")
                .help("Check email format and password presence before sending")
                .env("KEYGATE_VALIDATE")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_REDIRECT_ON_FAILURE)
                .long("redirect-on-failure")
                .help("Redirect even when the login fails")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_NO_PROMPT)
                .long("no-prompt")
                .help("Do not prompt for fields missing from --field")
                .action(ArgAction::SetTrue),
        )
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("keygate")
        .about("Sign in to the API and keep the session tokens")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_STORAGE)
                .short('s')
                .long("storage")
                .help("Session file, default: <data-local-dir>/keygate/session.json")
                .env("KEYGATE_STORAGE")
                .global(true)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .subcommand(login_command())
        .subcommand(Command::new("status").about("Show whether a session is stored"))
        .subcommand(Command::new("logout").about("Remove the stored session tokens"));

    logging::with_args(command)
}
