//! Cooperative handling of SIGINT/SIGTERM. After [`initialize`] was called, a termination signal
//! does not kill the process but sets a flag which long-running algorithms poll via
//! [`received_ctrl_c`]. They then stop and report their best known solution.

use log::{info, warn};
use std::sync::{
    Once,
    atomic::{AtomicBool, Ordering},
};

static RECEIVED: AtomicBool = AtomicBool::new(false);
static INIT: Once = Once::new();

/// Installs the signal handler. Repeated calls are no-ops.
pub fn initialize() {
    INIT.call_once(|| {
        if let Err(e) = ctrlc::set_handler(|| {
            info!("Received termination signal; stop at next opportunity");
            RECEIVED.store(true, Ordering::Release);
        }) {
            warn!("Could not install signal handler: {e}");
        }
    });
}

/// Returns true if a termination signal was received since the program started
pub fn received_ctrl_c() -> bool {
    RECEIVED.load(Ordering::Acquire)
}
