//! Backend collaborator.
//!
//! All data reaches the views through opaque `call(method, params)` pairs.
//! The demo backend serves fixtures from memory with a small artificial
//! delay, so overlapping loads behave like real network calls.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

/// Error surfaced by a backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown method '{0}'")]
    UnknownMethod(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("malformed params for '{method}': {reason}")]
    BadParams {
        method: &'static str,
        reason: &'static str,
    },
}

/// Asynchronous request/response surface the views load data from.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn call(&self, method: &str, params: Value) -> Result<Value, ApiError>;
}

/// In-memory backend with campaign and template fixtures.
pub struct MockBackend {
    delay: Duration,
    campaigns: Vec<Value>,
    templates: Vec<Value>,
}

impl MockBackend {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            campaigns: campaign_fixtures(),
            templates: template_fixtures(),
        }
    }

    fn campaign(&self, id: &str) -> Result<&Value, ApiError> {
        self.campaigns
            .iter()
            .find(|c| c["id"].to_string() == id)
            .ok_or(ApiError::NotFound {
                entity: "campaign",
                id: id.to_string(),
            })
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn call(&self, method: &str, params: Value) -> Result<Value, ApiError> {
        tokio::time::sleep(self.delay).await;
        log::debug!("backend call: {method} {params}");

        match method {
            "get_dashboard_stats" => Ok(json!({
                "campaigns": self.campaigns.len(),
                "templates": self.templates.len(),
                "emails_sent": self
                    .campaigns
                    .iter()
                    .filter_map(|c| c["stats"]["sent"].as_i64())
                    .sum::<i64>(),
            })),
            "list_campaigns" => Ok(Value::Array(self.campaigns.clone())),
            "get_campaign" => {
                let id = params["id"].as_str().ok_or(ApiError::BadParams {
                    method: "get_campaign",
                    reason: "missing string 'id'",
                })?;
                self.campaign(id).cloned()
            }
            "list_templates" => Ok(Value::Array(self.templates.clone())),
            other => Err(ApiError::UnknownMethod(other.to_string())),
        }
    }
}

fn campaign_fixtures() -> Vec<Value> {
    vec![
        json!({
            "id": 42,
            "name": "Quarterly customer survey",
            "status": "active",
            "created_at": "2025-06-02",
            "stats": { "sent": 180, "responses": 64 },
            "contacts": [
                { "id": 1, "email": "ada@example.com", "name": "Ada", "responded": true },
                { "id": 2, "email": "grace@example.com", "name": "Grace", "responded": false },
                { "id": 3, "email": "edsger@example.com", "name": "Edsger", "responded": true },
            ],
        }),
        json!({
            "id": 43,
            "name": "Onboarding feedback",
            "status": "draft",
            "created_at": "2025-07-18",
            "stats": { "sent": 0, "responses": 0 },
            "contacts": [],
        }),
        json!({
            "id": 44,
            "name": "Renewal outreach",
            "status": "completed",
            "created_at": "2025-01-09",
            "stats": { "sent": 560, "responses": 210 },
            "contacts": [
                { "id": 7, "email": "tony@example.com", "name": "Tony", "responded": false },
            ],
        }),
    ]
}

fn template_fixtures() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "Survey invite", "subject": "We'd love your feedback", "updated_at": "2025-05-11" }),
        json!({ "id": 2, "name": "Reminder", "subject": "A quick reminder", "updated_at": "2025-06-30" }),
    ]
}
