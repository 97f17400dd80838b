//! # feederdash-app
//!
//! Application layer — the dashboard session and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `FeederApi` — the feeder's REST surface
//!   - `PhotoStore` — somewhere to keep captured photos
//! - Define the **driving/inbound** use-case object:
//!   - `DashboardSession` — poll loop, commands, config load/save, camera,
//!     reboot choreography
//! - Publish the view model and toasts to whichever front-end is attached
//!
//! ## Dependency rule
//! Depends on `feederdash-domain` only (plus `tokio` for tasks, timers and
//! channels). Never imports adapter crates. Adapters depend on *this* crate,
//! not the reverse.

pub mod ports;
pub mod session;
