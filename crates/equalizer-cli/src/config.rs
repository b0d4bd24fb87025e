//! Connection settings from flags and environment.

use std::time::Duration;

use clap::Args;
use equalizer_agent::{AgentConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use equalizer_core::AgentIds;
use equalizer_core::agent::{EMAILER_AGENT_ID, EQUALIZER_AGENT_ID, SCANNER_AGENT_ID};

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Base URL of the agent service
    #[arg(long, env = "EQUALIZER_AGENT_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub agent_url: String,

    /// API key sent as x-api-key
    #[arg(long, env = "EQUALIZER_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Clause extraction agent
    #[arg(long, env = "EQUALIZER_SCANNER_ID", default_value = SCANNER_AGENT_ID, global = true)]
    pub scanner_id: String,

    /// Fairness analysis agent
    #[arg(long, env = "EQUALIZER_EQUALIZER_ID", default_value = EQUALIZER_AGENT_ID, global = true)]
    pub equalizer_id: String,

    /// Email drafting agent
    #[arg(long, env = "EQUALIZER_EMAILER_ID", default_value = EMAILER_AGENT_ID, global = true)]
    pub emailer_id: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "EQUALIZER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs(), global = true)]
    pub timeout_secs: u64,
}

impl ConnectionArgs {
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            base_url: self.agent_url.trim_end_matches('/').to_string(),
            api_key: self.api_key.clone().filter(|k| !k.trim().is_empty()),
            agents: AgentIds {
                scanner: self.scanner_id.clone(),
                equalizer: self.equalizer_id.clone(),
                emailer: self.emailer_id.clone(),
            },
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        connection: ConnectionArgs,
    }

    fn parse(args: &[&str]) -> AgentConfig {
        let mut argv = vec!["equalizer"];
        argv.extend_from_slice(args);
        Harness::try_parse_from(argv).unwrap().connection.agent_config()
    }

    #[test]
    fn overrides_apply() {
        let config = parse(&[
            "--agent-url",
            "https://agents.example.com/",
            "--api-key",
            "k-123",
            "--scanner-id",
            "scan-a",
            "--timeout-secs",
            "5",
        ]);
        assert_eq!(config.base_url, "https://agents.example.com");
        assert_eq!(config.api_key.as_deref(), Some("k-123"));
        assert_eq!(config.agents.scanner, "scan-a");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_api_key_is_dropped() {
        let config = parse(&["--api-key", "  "]);
        assert!(config.api_key.is_none());
    }
}
