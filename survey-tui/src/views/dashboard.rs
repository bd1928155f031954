//! Dashboard screen: headline numbers only, no table.

use serde_json::{json, Value};

use crate::api::{ApiError, Backend};

pub struct DashboardView {
    stats: Value,
}

impl DashboardView {
    pub async fn mount(backend: &dyn Backend) -> Result<Self, ApiError> {
        let stats = backend.call("get_dashboard_stats", json!({})).await?;
        Ok(Self { stats })
    }

    pub fn render(&self) -> Vec<String> {
        vec![
            "Dashboard".to_string(),
            format!(
                "  campaigns: {}  templates: {}  emails sent: {}",
                self.stats["campaigns"], self.stats["templates"], self.stats["emails_sent"]
            ),
        ]
    }
}
