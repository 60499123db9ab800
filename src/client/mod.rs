//! Native adapters for the session flow: `reqwest` transport, file storage and
//! a console navigator. Used by the terminal host.

pub mod http;
pub mod navigate;
pub mod storage;

pub use http::HttpTransport;
pub use navigate::ConsoleNavigator;
pub use storage::FileStorage;
