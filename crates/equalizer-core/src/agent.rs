//! Wire types for remote agent calls.

use serde::{Deserialize, Serialize};

use crate::clause::{AnalyzedClause, Clause, EqualizerSummary};

pub const SCANNER_AGENT_ID: &str = "698589a41caa4e686dd66e59";
pub const EQUALIZER_AGENT_ID: &str = "698589c1a791e6e318b8de57";
pub const EMAILER_AGENT_ID: &str = "698589e6a791e6e318b8de60";

/// The three agents of the pipeline, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRole {
    Scanner,
    Equalizer,
    Emailer,
}

impl AgentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scanner => "scanner",
            Self::Equalizer => "equalizer",
            Self::Emailer => "emailer",
        }
    }
}

/// Opaque agent identifiers for each role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIds {
    pub scanner: String,
    pub equalizer: String,
    pub emailer: String,
}

impl Default for AgentIds {
    fn default() -> Self {
        Self {
            scanner: SCANNER_AGENT_ID.to_string(),
            equalizer: EQUALIZER_AGENT_ID.to_string(),
            emailer: EMAILER_AGENT_ID.to_string(),
        }
    }
}

impl AgentIds {
    pub fn get(&self, role: AgentRole) -> &str {
        match role {
            AgentRole::Scanner => &self.scanner,
            AgentRole::Equalizer => &self.equalizer,
            AgentRole::Emailer => &self.emailer,
        }
    }
}

/// A single agent invocation: instruction text plus optional asset references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRequest {
    pub message: String,
    pub agent_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<String>,
}

/// Envelope returned by the agent service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentReply {
    pub success: bool,
    #[serde(default)]
    pub response: Option<AgentResponse>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub status: String,
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(default)]
    pub message: Option<String>,
}

impl AgentReply {
    pub fn ok(result: serde_json::Value) -> Self {
        Self {
            success: true,
            response: Some(AgentResponse {
                status: "success".to_string(),
                result,
                message: None,
            }),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.into()),
        }
    }

    /// The result payload when the call succeeded with status `"success"`.
    ///
    /// Otherwise returns the failure reason the agent gave, if any: the
    /// top-level `error`, then the response `message`.
    pub fn into_payload(self) -> Result<serde_json::Value, Option<String>> {
        let reason = |error: Option<String>, message: Option<String>| {
            error
                .or(message)
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
        };
        match self.response {
            Some(response) if self.success && self.error.is_none() && response.status == "success" => {
                Ok(response.result)
            }
            Some(response) => Err(reason(self.error, response.message)),
            None => Err(reason(self.error, None)),
        }
    }
}

// ── Stage payloads ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(default)]
    pub clauses: Vec<Clause>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EqualizeResult {
    #[serde(default)]
    pub analyzed_clauses: Vec<AnalyzedClause>,
    #[serde(default)]
    pub summary: Option<EqualizerSummary>,
}

/// Reply from the asset upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub success: bool,
    #[serde(default)]
    pub asset_ids: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}
