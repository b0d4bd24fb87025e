//! Remote agent client: invokes the hosted scanner, equalizer, and emailer agents
//! and uploads documents as attachable assets.

mod config;
mod error;
#[cfg(feature = "http")]
pub mod http;

pub use config::{AgentConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::AgentError;
#[cfg(feature = "http")]
pub use http::HttpAgentClient;

use async_trait::async_trait;
use equalizer_core::{AgentReply, AgentRequest, DocumentFile};

/// A service that can run agent calls and accept document uploads.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Invoke one agent with an instruction and optional asset references.
    async fn invoke(&self, request: &AgentRequest) -> Result<AgentReply, AgentError>;

    /// Upload a document, returning asset references usable in [`AgentRequest::assets`].
    async fn upload(&self, document: &DocumentFile) -> Result<Vec<String>, AgentError>;
}
