//! # feederdash-domain
//!
//! Pure domain model for the feederdash pet-feeder dashboard.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps, endpoint paths
//! - Define the **status snapshot** reported by the feeder on every poll
//! - Define the **feeder configuration** and the two independently saved
//!   setting groups (schedule, advanced), plus the editable **config form**
//! - Define the **dashboard view model** that front-ends render
//! - Define **commands** (feed now, cancel, reset daily, reboot) and the
//!   toast feedback derived from their replies
//! - Define the **camera panel** state (stream, placeholder, captured photo)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod camera;
pub mod command;
pub mod config;
pub mod connection;
pub mod endpoint;
pub mod format;
pub mod reply;
pub mod status;
pub mod toast;
pub mod view;
