//! Session Submitter: turns a form snapshot into a stored session.
//!
//! One submission projects the snapshot into credentials, optionally validates
//! them, sends a single `POST`, checks the status, parses `{jwt, refresh}`,
//! writes both tokens to storage and navigates to the redirect target. Nothing
//! is retried. Failures are returned as distinct `SubmitError` variants and,
//! under the default `RedirectPolicy::OnSuccess`, never navigate.

use super::{
    credentials::{Credentials, validate},
    errors::SubmitError,
    navigate::Navigator,
    state::{SubmissionState, SubmissionTracker},
    tokens::{LoginResponse, SessionTokens, TokenStorage, persist_tokens},
    transport::{HttpReply, LoginTransport, TransportError},
};
use crate::{
    config::{AppConfig, RedirectPolicy},
    form::FieldStateSnapshot,
};
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
pub struct Submitter<T, S, N> {
    login_url: String,
    redirect_to: String,
    redirect_policy: RedirectPolicy,
    validate: bool,
    transport: T,
    storage: S,
    navigator: N,
    tracker: SubmissionTracker,
}

impl<T, S, N> Submitter<T, S, N>
where
    T: LoginTransport,
    S: TokenStorage,
    N: Navigator,
{
    pub fn new(config: &AppConfig, transport: T, storage: S, navigator: N) -> Self {
        Self {
            login_url: config.login_url(),
            redirect_to: config.redirect_to.clone(),
            redirect_policy: config.redirect_policy,
            validate: config.validate,
            transport,
            storage,
            navigator,
            tracker: SubmissionTracker::new(),
        }
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    pub fn state(&self) -> SubmissionState {
        self.tracker.current()
    }

    /// Moves a settled submission back to `Idle`. Returns `false` while one is
    /// pending.
    pub fn reset(&self) -> bool {
        self.tracker.reset()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Submits the snapshot.
    ///
    /// # Errors
    /// - `InProgress` if another submission is pending (its state is untouched)
    /// - `MissingField` / `Invalid` before any request is sent
    /// - `Network` when no response arrived
    /// - `LoginFailed` on a non-2xx status
    /// - `ResponseParse` when the success body is unusable
    /// - `Storage` when the tokens could not be written
    #[instrument(skip_all, fields(url = %self.login_url))]
    pub async fn submit(
        &self,
        snapshot: &FieldStateSnapshot,
    ) -> Result<SessionTokens, SubmitError> {
        let in_flight = self.tracker.try_begin().inspect_err(|_| {
            warn!("rejected login: a submission is already in progress");
        })?;

        let result = self.run(snapshot).await;

        match &result {
            Ok(_) => {
                in_flight.succeed();
                info!(redirect_to = %self.redirect_to, "login succeeded");
                self.navigator.navigate(&self.redirect_to);
            }
            Err(err) => {
                if let Some(kind) = err.kind() {
                    in_flight.fail(kind);
                }
                warn!(error = %err, "login failed");
                if self.redirect_policy == RedirectPolicy::Always {
                    self.navigator.navigate(&self.redirect_to);
                }
            }
        }

        result
    }

    async fn run(&self, snapshot: &FieldStateSnapshot) -> Result<SessionTokens, SubmitError> {
        let credentials = Credentials::from_snapshot(snapshot)?;
        debug!(email = %credentials.email, "submitting credentials");

        if self.validate {
            validate(&credentials)?;
        }

        let reply = self
            .transport
            .post_json(&self.login_url, &credentials.to_json())
            .await
            .map_err(|err| match err {
                TransportError::Body(message) => SubmitError::ResponseParse(message),
                other => SubmitError::Network(other.to_string()),
            })?;

        let tokens = parse_reply(reply)?;
        persist_tokens(&self.storage, &tokens)?;
        debug!("session tokens stored");

        Ok(tokens)
    }
}

fn parse_reply(reply: HttpReply) -> Result<SessionTokens, SubmitError> {
    if !reply.is_success() {
        return Err(SubmitError::LoginFailed {
            status: reply.status,
            status_text: reply.status_text,
        });
    }

    let body: LoginResponse = serde_json::from_str(&reply.body)
        .map_err(|err| SubmitError::ResponseParse(err.to_string()))?;

    SessionTokens::new(body.jwt, body.refresh)
        .ok_or_else(|| SubmitError::ResponseParse("empty jwt or refresh token".to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::{
        form::{EMAIL_FIELD, FieldStore, PASSWORD_FIELD, login_fields},
        session::{
            errors::ErrorKind,
            tokens::{JWT_KEY, MemoryStorage, REFRESH_KEY, StorageError},
        },
    };
    use serde_json::{Value, json};
    use std::{sync::Mutex, time::Duration};
    use tokio::sync::Notify;

    /// Replays one canned reply and records every request.
    #[derive(Default)]
    struct ScriptedTransport {
        reply: Mutex<Option<Result<HttpReply, TransportError>>>,
        requests: Mutex<Vec<(String, Value)>>,
        gate: Option<Notify>,
    }

    impl ScriptedTransport {
        fn replying(status: u16, status_text: &str, body: &str) -> Self {
            Self {
                reply: Mutex::new(Some(Ok(HttpReply {
                    status,
                    status_text: status_text.to_string(),
                    body: body.to_string(),
                }))),
                ..Self::default()
            }
        }

        fn failing(err: TransportError) -> Self {
            Self {
                reply: Mutex::new(Some(Err(err))),
                ..Self::default()
            }
        }

        fn gated(mut self) -> Self {
            self.gate = Some(Notify::new());
            self
        }

        fn requests(&self) -> Vec<(String, Value)> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl LoginTransport for ScriptedTransport {
        async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, TransportError> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), body.clone()));
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.reply
                .lock()
                .unwrap()
                .take()
                .expect("transport called more than once")
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        visits: Mutex<Vec<String>>,
    }

    impl RecordingNavigator {
        fn visits(&self) -> Vec<String> {
            self.visits.lock().unwrap().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, target: &str) {
            self.visits.lock().unwrap().push(target.to_string());
        }
    }

    /// Memory storage whose writes to one key always fail.
    #[derive(Default)]
    struct QuotaStorage {
        inner: MemoryStorage,
        full_key: &'static str,
    }

    impl TokenStorage for QuotaStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == self.full_key {
                return Err(StorageError::Unavailable("quota".to_string()));
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove_item(key)
        }
    }

    fn snapshot(email: &str, password: &str) -> FieldStateSnapshot {
        let mut store = FieldStore::new(login_fields()).unwrap();
        store.set_value(EMAIL_FIELD, email).unwrap();
        store.set_value(PASSWORD_FIELD, password).unwrap();
        store.snapshot()
    }

    fn submitter<'a>(
        config: &AppConfig,
        transport: &'a ScriptedTransport,
        navigator: &'a RecordingNavigator,
    ) -> Submitter<&'a ScriptedTransport, MemoryStorage, &'a RecordingNavigator> {
        Submitter::new(config, transport, MemoryStorage::new(), navigator)
    }

    fn config() -> AppConfig {
        AppConfig::new("http://api.test")
    }

    #[tokio::test]
    async fn happy_path_stores_tokens_and_redirects_once() {
        let transport = ScriptedTransport::replying(200, "OK", r#"{"jwt":"J","refresh":"R"}"#);
        let navigator = RecordingNavigator::default();
        let submitter = submitter(&config(), &transport, &navigator);

        let tokens = submitter.submit(&snapshot("a@b.com", "p")).await.unwrap();

        assert_eq!(tokens.access_token, "J");
        assert_eq!(tokens.refresh_token, "R");
        assert_eq!(submitter.storage().get_item(JWT_KEY).unwrap().as_deref(), Some("J"));
        assert_eq!(
            submitter.storage().get_item(REFRESH_KEY).unwrap().as_deref(),
            Some("R")
        );
        assert_eq!(navigator.visits(), vec!["/".to_string()]);
        assert_eq!(submitter.state(), SubmissionState::Succeeded);
    }

    #[tokio::test]
    async fn sends_projected_credentials_to_login_url() {
        let transport = ScriptedTransport::replying(200, "OK", r#"{"jwt":"J","refresh":"R"}"#);
        let navigator = RecordingNavigator::default();
        let submitter = submitter(&config(), &transport, &navigator);

        submitter.submit(&snapshot("a@b.com", "p")).await.unwrap();

        assert_eq!(
            transport.requests(),
            vec![(
                "http://api.test/v1.1/login".to_string(),
                json!({"email": "a@b.com", "password": "p"})
            )]
        );
    }

    #[tokio::test]
    async fn empty_fields_are_sent_unvalidated() {
        let transport = ScriptedTransport::replying(400, "Bad Request", "");
        let navigator = RecordingNavigator::default();
        let submitter = submitter(&config(), &transport, &navigator);

        let err = submitter.submit(&snapshot("", "")).await.unwrap_err();

        assert!(matches!(err, SubmitError::LoginFailed { status: 400, .. }));
        assert_eq!(
            transport.requests()[0].1,
            json!({"email": "", "password": ""})
        );
    }

    #[tokio::test]
    async fn unauthorized_leaves_storage_untouched() {
        let transport = ScriptedTransport::replying(401, "Unauthorized", r#"{"error":"nope"}"#);
        let navigator = RecordingNavigator::default();
        let submitter = submitter(&config(), &transport, &navigator);

        let err = submitter.submit(&snapshot("a@b.com", "bad")).await.unwrap_err();

        match err {
            SubmitError::LoginFailed {
                status,
                status_text,
            } => {
                assert_eq!(status, 401);
                assert_eq!(status_text, "Unauthorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(submitter.storage().is_empty());
        assert!(navigator.visits().is_empty());
        assert_eq!(
            submitter.state(),
            SubmissionState::Failed(ErrorKind::LoginFailed)
        );
    }

    #[tokio::test]
    async fn non_json_body_is_a_parse_error() {
        let transport = ScriptedTransport::replying(200, "OK", "<html>welcome</html>");
        let navigator = RecordingNavigator::default();
        let submitter = submitter(&config(), &transport, &navigator);

        let err = submitter.submit(&snapshot("a@b.com", "p")).await.unwrap_err();

        assert!(matches!(err, SubmitError::ResponseParse(_)));
        assert!(submitter.storage().is_empty());
        assert!(navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn missing_or_empty_tokens_are_parse_errors() {
        for body in [r#"{"jwt":"J"}"#, r#"{"jwt":"","refresh":"R"}"#] {
            let transport = ScriptedTransport::replying(200, "OK", body);
            let navigator = RecordingNavigator::default();
            let submitter = submitter(&config(), &transport, &navigator);

            let err = submitter.submit(&snapshot("a@b.com", "p")).await.unwrap_err();

            assert!(matches!(err, SubmitError::ResponseParse(_)), "body: {body}");
            assert!(submitter.storage().is_empty());
        }
    }

    #[tokio::test]
    async fn transport_failure_is_a_network_error() {
        let transport = ScriptedTransport::failing(TransportError::Unreachable(
            "connection refused".to_string(),
        ));
        let navigator = RecordingNavigator::default();
        let submitter = submitter(&config(), &transport, &navigator);

        let err = submitter.submit(&snapshot("a@b.com", "p")).await.unwrap_err();

        assert!(matches!(err, SubmitError::Network(ref msg) if msg.contains("connection refused")));
        assert_eq!(submitter.state(), SubmissionState::Failed(ErrorKind::Network));
        assert!(submitter.storage().is_empty());
    }

    #[tokio::test]
    async fn unreadable_success_body_is_a_parse_error() {
        let transport = ScriptedTransport::failing(TransportError::Body(
            "error decoding response body".to_string(),
        ));
        let navigator = RecordingNavigator::default();
        let submitter = submitter(&config(), &transport, &navigator);

        let err = submitter.submit(&snapshot("a@b.com", "p")).await.unwrap_err();

        assert!(matches!(err, SubmitError::ResponseParse(_)), "{err:?}");
        assert_eq!(
            submitter.state(),
            SubmissionState::Failed(ErrorKind::ResponseParse)
        );
        assert!(submitter.storage().is_empty());
    }

    #[tokio::test]
    async fn storage_failure_keeps_previous_session() {
        let transport =
            ScriptedTransport::replying(200, "OK", r#"{"jwt":"NEW_J","refresh":"NEW_R"}"#);
        let navigator = RecordingNavigator::default();
        let storage = QuotaStorage {
            full_key: REFRESH_KEY,
            ..QuotaStorage::default()
        };
        storage.inner.set_item(JWT_KEY, "OLD_J").unwrap();
        storage.inner.set_item(REFRESH_KEY, "OLD_R").unwrap();
        let submitter = Submitter::new(&config(), &transport, storage, &navigator);

        let err = submitter.submit(&snapshot("a@b.com", "p")).await.unwrap_err();

        assert!(matches!(err, SubmitError::Storage(_)), "{err:?}");
        assert_eq!(submitter.state(), SubmissionState::Failed(ErrorKind::Storage));
        assert!(navigator.visits().is_empty());
        assert_eq!(
            submitter.storage().get_item(JWT_KEY).unwrap().as_deref(),
            Some("OLD_J")
        );
        assert_eq!(
            submitter.storage().get_item(REFRESH_KEY).unwrap().as_deref(),
            Some("OLD_R")
        );
    }

    #[tokio::test]
    async fn dropped_submission_can_be_resubmitted() {
        let transport = ScriptedTransport::replying(200, "OK", r#"{"jwt":"J","refresh":"R"}"#)
            .gated();
        let navigator = RecordingNavigator::default();
        let submitter = submitter(&config(), &transport, &navigator);
        let snapshot = snapshot("a@b.com", "p");

        let mut pending = Box::pin(submitter.submit(&snapshot));
        let waited = tokio::time::timeout(Duration::from_millis(20), pending.as_mut()).await;
        assert!(waited.is_err());
        assert_eq!(submitter.state(), SubmissionState::Submitting);

        drop(pending);
        assert_eq!(submitter.state(), SubmissionState::Idle);
        assert!(submitter.storage().is_empty());
        assert!(navigator.visits().is_empty());

        if let Some(gate) = &transport.gate {
            gate.notify_one();
        }
        let tokens = submitter.submit(&snapshot).await.unwrap();

        assert_eq!(tokens.access_token, "J");
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(navigator.visits(), vec!["/".to_string()]);
        assert_eq!(submitter.state(), SubmissionState::Succeeded);
    }

    #[tokio::test]
    async fn second_submit_is_rejected_while_pending() {
        let transport = ScriptedTransport::replying(200, "OK", r#"{"jwt":"J","refresh":"R"}"#)
            .gated();
        let navigator = RecordingNavigator::default();
        let submitter = submitter(&config(), &transport, &navigator);
        let snapshot = snapshot("a@b.com", "p");

        let first = submitter.submit(&snapshot);
        let second = async {
            tokio::task::yield_now().await;
            let result = submitter.submit(&snapshot).await;
            if let Some(gate) = &transport.gate {
                gate.notify_one();
            }
            result
        };
        let (first, second) = tokio::join!(first, second);

        assert!(first.is_ok());
        assert!(matches!(second, Err(SubmitError::InProgress)));
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(navigator.visits().len(), 1);
        assert_eq!(submitter.state(), SubmissionState::Succeeded);
    }

    #[tokio::test]
    async fn always_policy_redirects_after_failure() {
        let mut config = config();
        config.redirect_policy = RedirectPolicy::Always;
        let transport = ScriptedTransport::replying(500, "Internal Server Error", "");
        let navigator = RecordingNavigator::default();
        let submitter = submitter(&config, &transport, &navigator);

        let err = submitter.submit(&snapshot("a@b.com", "p")).await.unwrap_err();

        assert!(matches!(err, SubmitError::LoginFailed { status: 500, .. }));
        assert_eq!(navigator.visits(), vec!["/".to_string()]);
        assert!(submitter.storage().is_empty());
    }

    #[tokio::test]
    async fn validation_stage_blocks_request() {
        let mut config = config();
        config.validate = true;
        let transport = ScriptedTransport::replying(200, "OK", r#"{"jwt":"J","refresh":"R"}"#);
        let navigator = RecordingNavigator::default();
        let submitter = submitter(&config, &transport, &navigator);

        let err = submitter.submit(&snapshot("nope", "p")).await.unwrap_err();

        assert!(matches!(err, SubmitError::Invalid(_)));
        assert!(transport.requests().is_empty());
        assert_eq!(
            submitter.state(),
            SubmissionState::Failed(ErrorKind::Validation)
        );
    }

    #[tokio::test]
    async fn snapshot_without_credentials_fails_before_sending() {
        let transport = ScriptedTransport::replying(200, "OK", r#"{"jwt":"J","refresh":"R"}"#);
        let navigator = RecordingNavigator::default();
        let submitter = submitter(&config(), &transport, &navigator);
        let snapshot: FieldStateSnapshot = [("username", "bob")].into_iter().collect();

        let err = submitter.submit(&snapshot).await.unwrap_err();

        assert!(matches!(err, SubmitError::MissingField(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn resubmit_after_failure_is_allowed() {
        let transport = ScriptedTransport::replying(401, "Unauthorized", "");
        let navigator = RecordingNavigator::default();
        let submitter = submitter(&config(), &transport, &navigator);
        let snapshot = snapshot("a@b.com", "p");

        assert!(submitter.submit(&snapshot).await.is_err());
        *transport.reply.lock().unwrap() = Some(Ok(HttpReply {
            status: 200,
            status_text: "OK".to_string(),
            body: r#"{"jwt":"J2","refresh":"R2"}"#.to_string(),
        }));

        let tokens = submitter.submit(&snapshot).await.unwrap();
        assert_eq!(tokens.access_token, "J2");
        assert_eq!(navigator.visits().len(), 1);
    }
}
