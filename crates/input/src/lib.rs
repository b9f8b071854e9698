//! User actions: the only way key presses reach the intent state.
//!
//! # Invariants
//! - Platform code produces actions; it never edits `AppState` directly.
//! - Applying an action is edge-triggered: one press, one action.

pub mod action;

pub use action::Action;
