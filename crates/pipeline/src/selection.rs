//! Scoped access to the host selection

use modelgen_core::error::Result;
use modelgen_core::host::{Selection, SelectionService};

/// Holds an acquired selection and releases it when dropped
pub struct SelectionGuard<'a> {
    service: &'a dyn SelectionService,
    selection: Selection,
}

impl<'a> SelectionGuard<'a> {
    /// Acquire the current selection
    ///
    /// Nothing is held when acquisition itself fails, so nothing is released.
    pub fn acquire(service: &'a dyn SelectionService) -> Result<Self> {
        let selection = service.acquire()?;
        Ok(Self { service, selection })
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }
}

impl Drop for SelectionGuard<'_> {
    fn drop(&mut self) {
        self.service.release();
    }
}
