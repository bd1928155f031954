//! Campaign detail screen: one campaign plus its contact list.

use rudder::prelude::*;
use serde_json::{json, Value};

use crate::api::{ApiError, Backend};

use super::render_table;

pub struct CampaignDetailView {
    campaign: Value,
    contacts: TableState,
}

impl CampaignDetailView {
    /// Mount the detail screen for the campaign named by the `:id` route
    /// parameter. An unknown id is a mount failure and surfaces through the
    /// router's error boundary.
    pub async fn mount(backend: &dyn Backend, id: &str) -> Result<Self, ApiError> {
        let campaign = backend.call("get_campaign", json!({ "id": id })).await?;

        let columns = vec![
            Column::new("name", "Name"),
            Column::new("email", "Email"),
            Column::new("responded", "Responded").render(|value, _record| {
                match value.and_then(Value::as_bool) {
                    Some(true) => "yes".to_string(),
                    _ => "no".to_string(),
                }
            }),
        ];
        let mut contacts = TableState::new(TableOptions::new(columns).page_size(5));
        let rows = campaign["contacts"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        contacts.set_data(rows.into_iter().map(Record::new).collect());

        Ok(Self { campaign, contacts })
    }

    pub fn contacts_mut(&mut self) -> &mut TableState {
        &mut self.contacts
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Campaign {}: {}",
                self.campaign["id"], self.campaign["name"]
            ),
            format!(
                "  status: {}  sent: {}  responses: {}",
                self.campaign["status"],
                self.campaign["stats"]["sent"],
                self.campaign["stats"]["responses"]
            ),
        ];
        lines.extend(render_table(&self.contacts));
        lines
    }
}
