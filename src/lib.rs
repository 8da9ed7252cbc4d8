//! Client-side coordination core for a remote service-management API:
//! service list with search/sort, per-action locking, a single file-edit
//! session, and stacked notifications, plus a terminal front end.

pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod file_session;
pub mod gateway;
pub mod inspector;
pub mod logging;
pub mod model;
pub mod notify;
pub mod projection;
pub mod registry;
pub mod tui;

mod tui_shell;
