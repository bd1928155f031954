//! Email templates list screen.

use rudder::prelude::*;
use serde_json::{json, Value};

use crate::api::{ApiError, Backend};

use super::render_table;

pub struct TemplatesView {
    table: TableState,
}

impl TemplatesView {
    pub async fn mount(backend: &dyn Backend) -> Result<Self, ApiError> {
        let columns = vec![
            Column::new("name", "Name"),
            Column::new("subject", "Subject"),
            Column::new("updated_at", "Updated").date(),
        ];
        let mut table = TableState::new(TableOptions::new(columns));

        let payload = backend.call("list_templates", json!({})).await?;
        let rows = match payload {
            Value::Array(items) => items.into_iter().map(Record::new).collect(),
            _ => Vec::new(),
        };
        table.set_data(rows);

        Ok(Self { table })
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec!["Templates".to_string()];
        lines.extend(render_table(&self.table));
        lines
    }
}
