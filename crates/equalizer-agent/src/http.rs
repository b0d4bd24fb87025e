//! HTTP client for the hosted agent service.

use async_trait::async_trait;
use equalizer_core::agent::UploadReceipt;
use equalizer_core::{AgentReply, AgentRequest, DocumentFile};
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use crate::{AgentClient, AgentConfig, AgentError};

/// Agent client speaking JSON to `{base_url}/api/agent` and multipart to
/// `{base_url}/api/upload`.
pub struct HttpAgentClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpAgentClient {
    /// Create a client from connection settings.
    pub fn new(config: &AgentConfig) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let builder = self.client.post(url);
        match &self.api_key {
            Some(key) => builder.header("x-api-key", key),
            None => builder,
        }
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<String, AgentError> {
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AgentError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn invoke(&self, request: &AgentRequest) -> Result<AgentReply, AgentError> {
        info!(
            agent_id = %request.agent_id,
            assets = request.assets.len(),
            "invoking agent"
        );
        debug!(message_len = request.message.len(), "agent instruction");

        let body = self.send(self.post("/api/agent").json(request)).await?;
        let reply: AgentReply = serde_json::from_str(&body)?;
        info!(agent_id = %request.agent_id, success = reply.success, "agent replied");
        Ok(reply)
    }

    async fn upload(&self, document: &DocumentFile) -> Result<Vec<String>, AgentError> {
        info!(name = %document.name, bytes = document.size(), "uploading document");
        let part = Part::bytes(document.bytes.clone())
            .file_name(document.name.clone())
            .mime_str(&document.media_type)?;
        let form = Form::new().part("file", part);

        let body = self.send(self.post("/api/upload").multipart(form)).await?;
        let receipt: UploadReceipt = serde_json::from_str(&body)?;
        if !receipt.success {
            let reason = receipt
                .error
                .unwrap_or_else(|| "upload was not accepted".to_string());
            return Err(AgentError::Upload(reason));
        }
        if receipt.asset_ids.is_empty() {
            return Err(AgentError::Upload(
                "upload returned no asset references".to_string(),
            ));
        }
        info!(assets = receipt.asset_ids.len(), "upload complete");
        Ok(receipt.asset_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(base_url: String) -> HttpAgentClient {
        HttpAgentClient::new(&AgentConfig {
            base_url,
            api_key: Some("secret".into()),
            ..AgentConfig::default()
        })
        .unwrap()
    }

    async fn echo_agent(headers: HeaderMap, Json(req): Json<Value>) -> Json<Value> {
        let key = headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        Json(json!({
            "success": true,
            "response": {
                "status": "success",
                "result": {"agent_id": req["agent_id"], "message": req["message"], "key": key}
            }
        }))
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = client_for("http://localhost:3000/".into());
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[tokio::test]
    async fn invoke_posts_request_and_parses_reply() {
        let base = serve(Router::new().route("/api/agent", post(echo_agent))).await;
        let client = client_for(base);

        let reply = client
            .invoke(&AgentRequest {
                message: "scan this".into(),
                agent_id: "scanner-1".into(),
                assets: vec![],
            })
            .await
            .unwrap();

        let payload = reply.into_payload().unwrap();
        assert_eq!(payload["agent_id"], "scanner-1");
        assert_eq!(payload["message"], "scan this");
        assert_eq!(payload["key"], "secret");
    }

    #[tokio::test]
    async fn non_success_status_is_server_error() {
        let app = Router::new().route(
            "/api/agent",
            post(|| async { (StatusCode::BAD_GATEWAY, "agent offline") }),
        );
        let client = client_for(serve(app).await);

        let err = client
            .invoke(&AgentRequest {
                message: "m".into(),
                agent_id: "a".into(),
                assets: vec![],
            })
            .await
            .unwrap_err();
        match err {
            AgentError::Server { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "agent offline");
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_body_is_json_error() {
        let app = Router::new().route("/api/agent", post(|| async { "not json" }));
        let client = client_for(serve(app).await);

        let err = client
            .invoke(&AgentRequest {
                message: "m".into(),
                agent_id: "a".into(),
                assets: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Json(_)));
    }

    #[tokio::test]
    async fn upload_returns_asset_ids() {
        let app = Router::new().route(
            "/api/upload",
            post(|body: Bytes| async move {
                let body = String::from_utf8_lossy(&body).to_string();
                assert!(body.contains("filename=\"lease.pdf\""));
                assert!(body.contains("%PDF-1.4"));
                Json(json!({"success": true, "asset_ids": ["asset-42"]}))
            }),
        );
        let client = client_for(serve(app).await);

        let doc = DocumentFile::new("lease.pdf", "application/pdf", b"%PDF-1.4 body".to_vec());
        let ids = client.upload(&doc).await.unwrap();
        assert_eq!(ids, vec!["asset-42".to_string()]);
    }

    #[tokio::test]
    async fn rejected_upload_carries_reason() {
        let app = Router::new().route(
            "/api/upload",
            post(|| async { Json(json!({"success": false, "error": "quota exceeded"})) }),
        );
        let client = client_for(serve(app).await);

        let doc = DocumentFile::new("lease.pdf", "application/pdf", b"%PDF-".to_vec());
        let err = client.upload(&doc).await.unwrap_err();
        assert_eq!(err.to_string(), "upload failed: quota exceeded");
    }

    #[tokio::test]
    async fn upload_without_ids_fails() {
        let app = Router::new().route(
            "/api/upload",
            post(|| async { Json(json!({"success": true, "asset_ids": []})) }),
        );
        let client = client_for(serve(app).await);

        let doc = DocumentFile::new("lease.pdf", "application/pdf", b"%PDF-".to_vec());
        assert!(matches!(
            client.upload(&doc).await,
            Err(AgentError::Upload(_))
        ));
    }
}
