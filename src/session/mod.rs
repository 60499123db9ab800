//! Client-side session flow: credentials, submission, response handling and
//! token persistence. Password and token values pass through here and must
//! never be logged.

pub mod credentials;
pub mod errors;
pub mod navigate;
pub mod state;
pub mod submitter;
pub mod tokens;
pub mod transport;

pub use credentials::{Credentials, ValidationErrors, ValidationIssue, ValidationResult, validate};
pub use errors::{ErrorKind, SubmitError};
pub use navigate::Navigator;
pub use state::{SubmissionState, SubmissionTracker};
pub use submitter::Submitter;
pub use tokens::{
    JWT_KEY, MemoryStorage, REFRESH_KEY, SessionTokens, StorageError, TokenStorage, clear_tokens,
    is_authenticated, load_tokens, persist_tokens,
};
pub use transport::{HttpReply, LoginTransport, TransportError};
