//! Persistence layer: repository traits, implementations, and the global
//! repository instance.
//!
//! The module follows a layered arrangement: HTTP handlers call services,
//! services call the repository traits in [`repository`], and the traits are
//! implemented by the backends in [`repositories`].

pub mod repositories;
pub mod repository;

pub use repositories::LocalRepository;
pub use repository::{
    BookingRepository, ErrorContext, EstimateRepository, FullRepository, PackageRepository,
    PostRepository, RepositoryError, RepositoryResult, SessionRepository,
};

use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

/// Initialize the global repository singleton.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }
    let repo: Arc<dyn FullRepository> = Arc::new(LocalRepository::new());
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if REPOSITORY.get().is_none() {
        let _ = init_repository();
    }
    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
