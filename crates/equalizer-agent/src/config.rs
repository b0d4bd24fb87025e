use std::time::Duration;

use equalizer_core::AgentIds;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings for the agent service.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Service root like `http://localhost:3000` (trailing slash is trimmed).
    pub base_url: String,
    /// Sent as `x-api-key` when present.
    pub api_key: Option<String>,
    pub agents: AgentIds,
    pub timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            agents: AgentIds::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
