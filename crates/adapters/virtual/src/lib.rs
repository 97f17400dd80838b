//! # feederdash-adapter-virtual
//!
//! A simulated feeder speaking the same REST surface as the real device, for
//! demos and end-to-end tests.
//!
//! ## Behaviour
//!
//! | Endpoint | Behaviour |
//! |----------|-----------|
//! | `GET /api/status` | One simulation step, then the snapshot |
//! | `POST /api/feed/now` | Starts a feeding; declined while one runs |
//! | `POST /api/feed/cancel` | Back to idle |
//! | `GET /api/config` | Current configuration |
//! | `POST /api/config/{schedule,advanced}` | Updates one group |
//! | `POST /api/system/reset-daily` | Zeroes today's counter |
//! | `POST /api/system/reboot` | Drops any feeding, restarts uptime |
//! | `GET /camera/{stream,capture}` | A JPEG frame, or 503 when disabled |
//!
//! ## Dependency rule
//!
//! Depends on `feederdash-domain` only; it speaks the wire format, not the
//! application ports.

mod feeder;
mod router;

use std::sync::{Arc, Mutex};

pub use feeder::{COMPARTMENTS, FRAME, PROGRESS_STEP, Stage, VirtualFeeder};
pub use router::{SharedFeeder, build};

/// Wrap a feeder for sharing between the router and the caller.
#[must_use]
pub fn shared(feeder: VirtualFeeder) -> SharedFeeder {
    Arc::new(Mutex::new(feeder))
}
