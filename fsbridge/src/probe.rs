//! Filesystem detection
//!
//! There is no signature check of our own. The engine is asked to list the
//! root directory and stop at the first entry; engines fail fast on anything
//! that is not theirs, so a clean walk is the match criterion.

use crate::config::LogLevel;
use crate::engine::{DirhookInfo, FsEngine};
use crate::fs::Filesystem;
use core::ops::ControlFlow;

fn stop_at_first(_name: &str, _info: &DirhookInfo) -> ControlFlow<()> {
    ControlFlow::Break(())
}

impl<E: FsEngine> Filesystem<'_, E> {
    /// Whether the device holds a filesystem the engine understands
    ///
    /// An empty root directory is a match.
    pub fn probe(&self) -> bool {
        let (engine, device) = match (self.engine(), self.device()) {
            (Ok(engine), Ok(device)) => (engine, device),
            (Err(err), _) | (_, Err(err)) => {
                log::error!("probe: uninitialized variables: {}", err);
                return false;
            }
        };

        let mut hook = stop_at_first;
        match engine.dir(device, "/", &mut hook) {
            Ok(()) => {
                log::debug!("probe: '{}' recognised {:?}", engine.name(), device);
                true
            }
            Err(err) => {
                if self.config().logs(LogLevel::Info) {
                    log::info!("probe: {}: {}", engine.name(), err);
                }
                false
            }
        }
    }
}
