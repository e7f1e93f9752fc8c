//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Page rendering dispatch and overlays
//! - `home` - Featured trail page
//! - `trails` - Filter bar and trail grid
//! - `favorites` - Saved trails list
//! - `checklist` - Trip preparation checklist
//! - `modal` - Trail detail overlay
//! - `help` - Key binding overlay
//! - `status` - Status bar widget

mod checklist;
mod events;
mod favorites;
mod help;
mod home;
mod input;
mod loop_runner;
mod modal;
mod render;
mod status;
mod trails;

pub use loop_runner::{run, Action};
