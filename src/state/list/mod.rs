//! List domain layer
//!
//! Query composition, pagination, favorites-first ordering and the read-only
//! presenter used by list screens.

mod controller;
mod node;
mod ordering;
mod presenter;
mod query;

pub use controller::{ApplyOutcome, FetchKind, FetchTicket, ListController};
pub use node::{CreatedRecord, Node, Page, PageInfo};
pub use ordering::{insert_position, partition_favorites};
pub use presenter::{
    heartbeat_item, rotation_item, CreateAffordance, DialogResult, ItemMapper, ListItem,
    ListPresenter,
};
pub use query::{ListFilter, ListQuery, QueryComposer, HEARTBEAT_MONITORS_QUERY, ROTATIONS_QUERY};
