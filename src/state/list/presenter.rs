//! Read-only view contract for list screens

use super::controller::ListController;
use super::node::{CreatedRecord, Node};
use crate::state::SessionInfo;

/// A list row as the renderer sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub title: String,
    pub sub_text: String,
    pub url: String,
    pub is_favorite: bool,
}

/// Maps a backend node to a list row
pub type ItemMapper = fn(&Node) -> ListItem;

/// How a create dialog closed
#[derive(Debug, Clone, PartialEq)]
pub enum DialogResult {
    Cancelled,
    Created(CreatedRecord),
}

/// Anything that can be offered as a list's "create" action.
///
/// The list only needs a label to render the affordance and, once the dialog
/// closes, an optional created record to splice in.
pub trait CreateAffordance: Send {
    fn label(&self) -> &str;

    fn open(&mut self);

    fn is_open(&self) -> bool;

    /// Take the result of a closed dialog, if any
    fn take_result(&mut self) -> Option<DialogResult>;
}

/// Borrowed view over a [`ListController`]
pub struct ListPresenter<'a> {
    controller: &'a ListController,
    session: &'a SessionInfo,
    mapper: ItemMapper,
    create: Option<&'a dyn CreateAffordance>,
}

impl<'a> ListPresenter<'a> {
    pub fn new(controller: &'a ListController, session: &'a SessionInfo, mapper: ItemMapper) -> Self {
        Self {
            controller,
            session,
            mapper,
            create: None,
        }
    }

    /// Attach a create affordance; it is only shown to ready admin sessions
    pub fn with_create(mut self, create: Option<&'a dyn CreateAffordance>) -> Self {
        self.create = create;
        self
    }

    /// Rows in display order
    pub fn items(&self) -> Vec<ListItem> {
        self.controller.nodes().iter().map(self.mapper).collect()
    }

    pub fn len(&self) -> usize {
        self.controller.nodes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.controller.nodes().is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.controller.is_loading()
    }

    /// Banner text when the last fetch failed
    pub fn error_message(&self) -> Option<String> {
        self.controller.error().map(|e| e.to_string())
    }

    pub fn can_retry(&self) -> bool {
        self.controller.error().is_some() && !self.controller.is_loading()
    }

    pub fn can_load_more(&self) -> bool {
        self.controller.can_load_more()
    }

    pub fn show_create(&self) -> bool {
        self.create.is_some() && self.session.is_ready() && self.session.is_admin()
    }

    pub fn create_label(&self) -> Option<&str> {
        if self.show_create() {
            self.create.map(|c| c.label())
        } else {
            None
        }
    }
}

/// Rotation rows: name over description
pub fn rotation_item(node: &Node) -> ListItem {
    ListItem {
        title: node.text("name").to_string(),
        sub_text: node.text("description").to_string(),
        url: format!("/rotations/{}", node.id),
        is_favorite: node.is_favorite,
    }
}

/// Heartbeat monitor rows: name over timeout
pub fn heartbeat_item(node: &Node) -> ListItem {
    let sub_text = match node.display_fields.get("timeoutMinutes").and_then(|v| v.as_i64()) {
        Some(minutes) => format!("Timeout: {minutes} min"),
        None => String::new(),
    };
    ListItem {
        title: node.text("name").to_string(),
        sub_text,
        url: format!("/heartbeat-monitors/{}", node.id),
        is_favorite: node.is_favorite,
    }
}
