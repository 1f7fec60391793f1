//! Editing session module
//!
//! This module contains:
//! - Session state (layout, images, selection)
//! - Message types for every editor action
//! - Message handlers dispatching messages to state operations

pub mod handlers;
pub mod messages;
pub mod state;
