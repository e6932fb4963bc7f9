//! oncall-tui: list and form data binding for an on-call management backend
//!
//! `state` holds the UI-agnostic cores (list controllers, form binders, session
//! context); `api` talks to the backend; `app` and `ui` drive them from a terminal.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod router;
pub mod state;
pub mod ui;
