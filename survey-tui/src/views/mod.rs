//! View screens.
//!
//! Each list screen owns its own `TableState` and `LoadSequencer`; both are
//! created when the view mounts and dropped when the user navigates away,
//! which also discards any load still in flight.

mod campaign_detail;
mod campaigns;
mod dashboard;
mod templates;

use std::sync::{Arc, Mutex};

use rudder::prelude::*;

pub use self::campaign_detail::CampaignDetailView;
pub use self::campaigns::CampaignsView;
pub use self::dashboard::DashboardView;
pub use self::templates::TemplatesView;

/// The screen currently mounted, shared between the route handlers that
/// mount views and the event loop that interacts with them.
pub enum ViewScreen {
    Dashboard(DashboardView),
    Campaigns(CampaignsView),
    CampaignDetail(CampaignDetailView),
    Templates(TemplatesView),
}

pub type SharedScreen = Arc<Mutex<Option<ViewScreen>>>;

/// Render a table to plain text lines: header with sort affordances, one
/// line per visible row, then pagination and selection metadata.
pub fn render_table(table: &TableState) -> Vec<String> {
    let columns = &table.options().columns;
    let mut lines = Vec::new();

    if table.is_loading() {
        lines.push("  loading...".to_string());
        return lines;
    }

    let header = columns
        .iter()
        .map(|col| {
            let marker = match table.sort_state() {
                Some((key, SortDirection::Asc)) if key == col.key => " ^",
                Some((key, SortDirection::Desc)) if key == col.key => " v",
                _ => "",
            };
            format!("{}{marker}", col.title)
        })
        .collect::<Vec<_>>()
        .join(" | ");
    lines.push(header);

    for record in table.visible_page() {
        let selected = if table.is_selected(&table.row_key(record)) {
            "*"
        } else {
            " "
        };
        let cells = columns
            .iter()
            .map(|col| match &col.render {
                Some(render) => render(record.get_path(&col.key), record),
                None => record.get_text(&col.key).unwrap_or_default(),
            })
            .collect::<Vec<_>>()
            .join(" | ");
        lines.push(format!("{selected} {cells}"));
    }

    let info = table.page_info();
    if info.total_items == 0 {
        lines.push("  no data available".to_string());
    } else {
        lines.push(format!(
            "  showing {} to {} of {} (page {}/{})",
            info.start, info.end, info.total_items, info.current_page, info.total_pages
        ));
    }
    let selected = table.selected_keys().count();
    if selected > 0 {
        lines.push(format!("  {selected} selected"));
    }
    lines
}
