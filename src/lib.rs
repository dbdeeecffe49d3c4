//! QuickStart Web - a local browser front-end for the SDM QuickStart automation script
//!
//! The operator fills in a form, presses an action button, and the matching action of an
//! external PowerShell script runs as a child process. Its output lands in an activity
//! log, and structured data it prints can fill form fields back in.

pub mod actions;
pub mod activity_log;
pub mod auth;
pub mod config;
pub mod error;
pub mod escape;
pub mod executor;
pub mod form;
pub mod logging;
pub mod prelude;
pub mod protocol;
pub mod session;
pub mod web;
