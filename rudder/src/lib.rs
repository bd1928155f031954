//! Navigation and tabular state engine for single-page clients.
//!
//! Two independent pieces: a path-based [`router`] that resolves location
//! strings to registered view handlers, and a [`table`] state component that
//! derives a searched, filtered, sorted, paginated and selectable projection
//! of an in-memory record collection. The [`loader`] module guards
//! asynchronous data loads against stale responses.

pub mod loader;
pub mod router;
pub mod table;

pub mod prelude {
    pub use crate::loader::{LoadSequencer, LoadTicket};
    pub use crate::router::location::{LocationBus, MemoryLocation};
    pub use crate::router::pattern::RoutePattern;
    pub use crate::router::{HandlerResult, NavigationState, Router, RouterPhase, Screen};
    pub use crate::table::record::{Record, RowKey};
    pub use crate::table::selection::{Selection, SelectionMode};
    pub use crate::table::{Column, PageInfo, SortDirection, SortType, TableOptions, TableState};
}
