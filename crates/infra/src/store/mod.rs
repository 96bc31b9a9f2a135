//! Document store: a transactional unit of work over every collection.

mod documents;
mod memory;

pub use documents::Documents;
pub use memory::MemoryStore;

use std::sync::Arc;

use stockbook_core::DomainResult;

/// Transactional unit-of-work seam.
///
/// `transact` commits the mutations made by `f` iff it returns `Ok`; on
/// `Err` the store is left exactly as before the call. Writers are
/// serialized, so a closure always observes and produces consistent state
/// — this is what makes the stock ledger's read-modify-write atomic per
/// product.
pub trait UnitOfWork: Send + Sync {
    fn read<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&Documents) -> DomainResult<T>;

    fn transact<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&mut Documents) -> DomainResult<T>;
}

impl<S> UnitOfWork for Arc<S>
where
    S: UnitOfWork + ?Sized,
{
    fn read<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&Documents) -> DomainResult<T>,
    {
        (**self).read(f)
    }

    fn transact<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&mut Documents) -> DomainResult<T>,
    {
        (**self).transact(f)
    }
}
