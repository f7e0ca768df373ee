//! Loaded symbol file: store plus catalog.

use std::path::Path;

use crate::catalog::{Catalog, CatalogCounts};
use crate::error::PdbexResult;
use crate::session::DumpSession;
use crate::store::TypeStore;

/// Everything built once per symbol file.
///
/// Both halves are read-only after construction, so a `TypeDatabase` can be
/// shared freely. Mutable state lives in the [`DumpSession`]s it hands out.
///
/// ## Example
///
/// ```rust,no_run
/// use pdbex_core::TypeDatabase;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>>
/// {
///     let database = TypeDatabase::open("ntdll.pdb")?;
///     let mut session = database.session();
///     print!("{}", session.dump_by_name("_PEB", true));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TypeDatabase
{
    store: TypeStore,
    catalog: Catalog,
}

impl TypeDatabase
{
    /// Load a PDB and catalogue its types.
    ///
    /// ## Errors
    ///
    /// See [`TypeStore::open`].
    pub fn open(path: impl AsRef<Path>) -> PdbexResult<Self>
    {
        Ok(Self::from_store(TypeStore::open(path)?))
    }

    pub fn from_store(store: TypeStore) -> Self
    {
        let catalog = Catalog::build(&store);
        Self { store, catalog }
    }

    pub fn store(&self) -> &TypeStore
    {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog
    {
        &self.catalog
    }

    pub fn counts(&self) -> CatalogCounts
    {
        self.catalog.counts()
    }

    /// Start a dump session with a fresh resolver cache.
    pub fn session(&self) -> DumpSession<'_>
    {
        DumpSession::new(&self.store, &self.catalog)
    }
}
