use std::sync::RwLock;

use stockbook_core::{DomainError, DomainResult};

use super::{Documents, UnitOfWork};

/// In-memory document store.
///
/// Intended for tests/dev. Writers take the lock exclusively and commit a
/// mutated clone of the state only when the closure succeeds, so a failed
/// operation leaves nothing behind and concurrent writers never interleave
/// mid-operation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<Documents>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UnitOfWork for MemoryStore {
    fn read<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&Documents) -> DomainResult<T>,
    {
        let state = self
            .state
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        f(&state)
    }

    fn transact<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&mut Documents) -> DomainResult<T>,
    {
        let mut state = self
            .state
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;

        let mut working = state.clone();
        let value = f(&mut working)?;
        *state = working;
        Ok(value)
    }
}
