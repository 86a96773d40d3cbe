mod client;
pub mod config;
pub mod dispatcher;
pub mod errors;
mod refresh;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod token;
mod types;

pub use client::BookshelfClient;
pub use config::Config;
pub use dispatcher::{Dispatcher, FilePart, RequestBody, RequestOptions};
pub use errors::Error;
pub use session::{SessionEvent, SessionSignal};
pub use storage::{CredentialPair, CredentialStore, FileStore, MemoryStore, StoredCredentials};
pub use types::{Book, BookMetadataUpdate, BookUploadResponse, CurrentUser, MessageResponse};

#[cfg(test)]
pub(crate) mod tests;
