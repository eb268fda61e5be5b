use std::ops::{Deref, DerefMut};

use super::host::TransactionService;
use crate::error::HostError;

/// Scoped undo group.
///
/// Opened by [`UndoGroup::begin`]; [`commit`](UndoGroup::commit) ends the
/// group. Dropping the guard without a successful commit aborts the group,
/// restoring the host to its state at `begin`. The host is reachable through
/// the guard while it is open.
pub struct UndoGroup<'a, T: TransactionService + ?Sized> {
    host: &'a mut T,
    open: bool,
}

impl<'a, T: TransactionService + ?Sized> UndoGroup<'a, T> {
    pub fn begin(host: &'a mut T, label: &str) -> Result<Self, HostError> {
        host.begin_undo_group(label)?;
        tracing::debug!(label, "Opened undo group");
        Ok(Self { host, open: true })
    }

    /// End the group. On failure the guard stays armed and aborts on drop.
    pub fn commit(mut self) -> Result<(), HostError> {
        self.host.end_undo_group()?;
        self.open = false;
        Ok(())
    }
}

impl<T: TransactionService + ?Sized> Deref for UndoGroup<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.host
    }
}

impl<T: TransactionService + ?Sized> DerefMut for UndoGroup<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.host
    }
}

impl<T: TransactionService + ?Sized> Drop for UndoGroup<'_, T> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        match self.host.abort_undo_group() {
            Ok(()) => tracing::debug!("Aborted undo group"),
            Err(e) => tracing::error!(%e, "Failed to abort undo group"),
        }
    }
}
