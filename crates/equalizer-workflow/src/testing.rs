//! Scripted agent service and reply fixtures for driving a [`Workflow`](crate::Workflow)
//! without a network. Enabled by the `testing` feature.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use equalizer_agent::{AgentClient, AgentError};
use equalizer_core::{AgentReply, AgentRequest, DocumentFile};
use serde_json::{Value, json};

pub type Reply = Result<AgentReply, AgentError>;

/// Agent that replays canned replies in order and records every request.
pub struct ScriptedAgent {
    replies: Mutex<VecDeque<Reply>>,
    upload: Mutex<Option<Result<Vec<String>, AgentError>>>,
    requests: Mutex<Vec<AgentRequest>>,
}

impl ScriptedAgent {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            upload: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_upload(self, result: Result<Vec<String>, AgentError>) -> Self {
        *self.upload.lock().unwrap_or_else(PoisonError::into_inner) = Some(result);
        self
    }

    pub fn requests(&self) -> Vec<AgentRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AgentClient for ScriptedAgent {
    async fn invoke(&self, request: &AgentRequest) -> Result<AgentReply, AgentError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Other("no scripted reply".into())))
    }

    async fn upload(&self, _document: &DocumentFile) -> Result<Vec<String>, AgentError> {
        self.upload
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_else(|| Err(AgentError::Upload("no scripted upload".into())))
    }
}

pub fn ok(result: Value) -> Reply {
    Ok(AgentReply::ok(result))
}

/// Scanner reply with one Payment clause per id.
pub fn scan_ok(ids: &[u32]) -> Reply {
    let clauses: Vec<Value> = ids
        .iter()
        .map(|id| json!({"clause_id": id, "text": format!("Clause text {id}"), "topic": "Payment"}))
        .collect();
    ok(json!({ "clauses": clauses }))
}

/// `(clause_id, topic, verdict)` rows, with a summary computed to match.
pub fn equalize_ok(rows: &[(u32, &str, &str)]) -> Reply {
    let analyzed: Vec<Value> = rows
        .iter()
        .map(|(id, topic, verdict)| {
            json!({
                "clause_id": id,
                "original_text": format!("Clause text {id}"),
                "topic": topic,
                "fairness_verdict": verdict,
                "reasoning": "one-sided",
                "rewritten_text": format!("Rewritten {id}"),
                "changes_made": format!("changes to {id}")
            })
        })
        .collect();
    let unfair = rows.iter().filter(|(_, _, v)| *v == "Unfair").count();
    ok(json!({
        "analyzed_clauses": analyzed,
        "summary": {
            "total_clauses": rows.len(),
            "fair_clauses": rows.len() - unfair,
            "unfair_clauses": unfair,
            "categories_affected": []
        }
    }))
}

pub fn email_ok() -> Reply {
    ok(json!({
        "email_subject": "Requested amendments to the services agreement",
        "email_body": "Hello,\n\nWe propose the following changes.",
        "tone": "Professional",
        "key_points": ["Shorter payment terms", "Mutual termination"],
        "closing_recommendation": "Propose a call this week"
    }))
}
