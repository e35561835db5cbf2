// ready.rs - Readiness gate
//
// Holds a value that only exists once its resources are acquired. Calls
// made before that are rejected with `Error::NotReady`; a failed
// acquisition is remembered and reported on every later call.

use crate::error::{Error, Result};

#[derive(Debug)]
pub enum Readiness<T> {
    Pending,
    Ready(T),
    Failed(Error),
}

impl<T> Default for Readiness<T> {
    fn default() -> Self {
        Readiness::Pending
    }
}

impl<T> Readiness<T> {
    /// Settle a pending gate by running `init`. Once settled, `init` is not
    /// run again and the first outcome is kept.
    pub fn resolve_with(&mut self, init: impl FnOnce() -> Result<T>) -> Result<&mut T> {
        if let Readiness::Pending = self {
            *self = match init() {
                Ok(value) => Readiness::Ready(value),
                Err(e) => {
                    log::error!("initialization failed: {e}");
                    Readiness::Failed(e)
                }
            };
        }
        self.get_mut()
    }

    pub fn get_mut(&mut self) -> Result<&mut T> {
        match self {
            Readiness::Ready(value) => Ok(value),
            Readiness::Pending => Err(Error::NotReady),
            Readiness::Failed(e) => Err(e.clone()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready(_))
    }
}
