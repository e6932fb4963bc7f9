//! Application state definitions

use crate::router::Route;

/// Which list a screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Rotations,
    HeartbeatMonitors,
}

impl ListKind {
    pub fn of(route: &Route) -> Option<Self> {
        match route {
            Route::Rotations => Some(Self::Rotations),
            Route::HeartbeatMonitors => Some(Self::HeartbeatMonitors),
            _ => None,
        }
    }
}

/// Navigation and cursor state
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_route: Route,
    pub route_history: Vec<Route>,

    // Selection
    pub selected_index: usize,
    pub scroll_offset: usize,
}

impl AppState {
    pub fn new(route: Route) -> Self {
        Self {
            current_route: route,
            ..Default::default()
        }
    }

    /// Navigate to a route, remembering where we came from
    pub fn navigate(&mut self, route: Route) {
        if route == self.current_route {
            return;
        }
        let previous = std::mem::replace(&mut self.current_route, route);
        self.route_history.push(previous);
        self.reset_selection();
    }

    /// Go back; returns false when there's nowhere to go
    pub fn go_back(&mut self) -> bool {
        match self.route_history.pop() {
            Some(route) => {
                self.current_route = route;
                self.reset_selection();
                true
            }
            None => false,
        }
    }

    pub fn current_list(&self) -> Option<ListKind> {
        ListKind::of(&self.current_route)
    }

    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Keep the selection inside a list that may have shrunk or been reordered
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    /// Reset selection
    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    /// Scroll so the selection stays within `visible` rows
    pub fn follow_selection(&mut self, visible: usize) {
        if visible == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible {
            self.scroll_offset = self.selected_index + 1 - visible;
        }
    }
}
