use super::Logger;
use crate::{display::DisplayDevice, Error, Result};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Install a SIGINT/SIGTERM handler that flips the shared running flag instead of exiting immediately.
pub(super) fn create_shutdown_flag() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let running_handle = running.clone();

    ctrlc::set_handler(move || {
        running_handle.store(false, Ordering::SeqCst);
    })
    .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;

    Ok(running)
}

/// Blank the panel on the way out; a failure here is logged, never propagated.
pub(super) fn clear_on_exit<D: DisplayDevice>(device: &mut D, logger: &Logger) {
    if let Err(err) = device.clear() {
        logger.warn(format!("could not clear display on exit: {err}"));
    }
}
