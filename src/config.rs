//! Login flow configuration. The terminal host builds it from CLI arguments and
//! environment variables; the browser host reads build-time values with an
//! optional runtime override from `window.KEYGATE_CONFIG`. Values are public;
//! never put secrets here.

use crate::session::transport::build_url_with_base;
use std::time::Duration;

/// Fixed, version-prefixed path of the login endpoint.
pub const LOGIN_PATH: &str = "/v1.1/login";
/// Where to go after a successful login.
pub const DEFAULT_REDIRECT: &str = "/";
/// Request timeout applied by both transports.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// When to navigate away after a submission settles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RedirectPolicy {
    /// Only after the tokens were stored.
    #[default]
    OnSuccess,
    /// After every settled submission, failed ones included. The error is still
    /// returned to the caller.
    Always,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub login_path: String,
    pub redirect_to: String,
    pub timeout: Duration,
    /// Run `validate` before sending; off means the server decides.
    pub validate: bool,
    pub redirect_policy: RedirectPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            login_path: LOGIN_PATH.to_string(),
            redirect_to: DEFAULT_REDIRECT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            validate: false,
            redirect_policy: RedirectPolicy::default(),
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn login_url(&self) -> String {
        build_url_with_base(&self.api_base_url, &self.login_path)
    }

    /// Loads the browser configuration from the build-time `KEYGATE_API_URL`
    /// and applies runtime overrides.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::new(option_env!("KEYGATE_API_URL").unwrap_or(""));

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config
    }
}

#[derive(Default)]
struct RuntimeConfig {
    api_base_url: Option<String>,
    redirect_to: Option<String>,
    validate: Option<bool>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.redirect_to {
        config.redirect_to = value;
    }
    if let Some(value) = runtime.validate {
        config.validate = value;
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("KEYGATE_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        api_base_url: read_runtime_value(&object, "api_base_url"),
        redirect_to: read_runtime_value(&object, "redirect_to"),
        validate: Reflect::get(&object, &JsValue::from_str("validate"))
            .ok()
            .and_then(|value| value.as_bool()),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

#[cfg(target_arch = "wasm32")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key))
        .ok()?
        .as_string()?;
    normalize_runtime_value(&value)
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
