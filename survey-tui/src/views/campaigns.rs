//! Campaigns list screen.

use rudder::prelude::*;
use serde_json::{json, Value};

use crate::api::Backend;

use super::render_table;

pub struct CampaignsView {
    table: TableState,
    loads: LoadSequencer,
}

impl CampaignsView {
    pub fn new() -> Self {
        let columns = vec![
            Column::new("name", "Name"),
            Column::new("status", "Status").render(|value, _record| match value {
                Some(Value::String(s)) => s.to_uppercase(),
                _ => "-".to_string(),
            }),
            Column::new("stats.sent", "Sent").numeric(),
            Column::new("stats.responses", "Responses").numeric(),
            Column::new("created_at", "Created").date(),
        ];
        Self {
            table: TableState::new(TableOptions::new(columns).multi_select().page_size(2)),
            loads: LoadSequencer::new(),
        }
    }

    /// Load (or reload) the campaign list. A reload superseded by a newer
    /// one before its response arrives is discarded. Backend failures leave
    /// an empty table rather than tearing the screen down.
    pub async fn load(&mut self, backend: &dyn Backend) {
        self.table.set_loading(true);
        let ticket = self.loads.begin();
        let payload = backend.call("list_campaigns", json!({})).await;
        ticket.apply(|| {
            match payload {
                Ok(Value::Array(items)) => {
                    self.table
                        .set_data(items.into_iter().map(Record::new).collect());
                }
                Ok(other) => {
                    log::warn!("unexpected list_campaigns payload: {other}");
                    self.table.set_data(Vec::new());
                }
                Err(ref error) => {
                    log::error!("failed to load campaigns: {error}");
                    self.table.set_data(Vec::new());
                }
            }
            self.table.set_loading(false);
        });
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableState {
        &mut self.table
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec!["Campaigns".to_string()];
        lines.extend(render_table(&self.table));
        lines
    }
}

impl Default for CampaignsView {
    fn default() -> Self {
        Self::new()
    }
}
