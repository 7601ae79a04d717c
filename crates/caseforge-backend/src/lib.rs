//! CaseForge generation backend
//!
//! The contract between the pipeline and its external collaborators:
//!
//! - [`ChatBackend`]: JSON-mode chat completion capability, injected into
//!   the engine so tests can run against fakes
//! - [`OpenAiBackend`]: the production implementation over HTTP
//! - [`DocumentExporter`]: binary export collaborator seam

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod export;
mod openai;

pub use error::{BackendError, ExportError};
pub use export::DocumentExporter;
pub use openai::{
    ChatBackend, ChatReply, ChatRequest, OpenAiBackend, API_KEY_ENV, BASE_URL_ENV,
    DEFAULT_BASE_URL,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
