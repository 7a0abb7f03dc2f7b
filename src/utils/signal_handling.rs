//! Cooperative handling of SIGINT/SIGTERM: the handler only raises a flag that long running
//! algorithms poll between steps (see [`crate::algorithm::IterativeAlgorithm::run_while`]).

use std::sync::{
    Once,
    atomic::{AtomicBool, Ordering},
};

use log::{info, warn};

static RECEIVED_SIGNAL: AtomicBool = AtomicBool::new(false);
static INIT: Once = Once::new();

/// Installs the handler. Subsequent calls are no-ops.
pub fn initialize() {
    INIT.call_once(|| {
        if let Err(e) = ctrlc::set_handler(|| {
            info!("Received termination signal; stopping after the current step");
            RECEIVED_SIGNAL.store(true, Ordering::Release);
        }) {
            warn!("Could not install signal handler: {e}");
        }
    });
}

/// Returns true if a termination signal was received since the handler was installed
pub fn received_ctrl_c() -> bool {
    RECEIVED_SIGNAL.load(Ordering::Acquire)
}
