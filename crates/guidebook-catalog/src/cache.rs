//! Lazily-built, shared catalog.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::catalog::Catalog;
use crate::error::CatalogLoadError;
use crate::repository::{load_all, CatalogOptions};

/// A catalog that is loaded on first access and then shared.
///
/// At most one load runs at a time: callers arriving while a load is in
/// flight wait for it and receive the same `Arc<Catalog>`. The load runs in
/// its own task, so a caller that gives up waiting does not abort it. A
/// successful load is kept for the lifetime of the cache. A failed load is
/// not kept, so the next caller starts a fresh one.
#[derive(Debug)]
pub struct CatalogCache {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    root: PathBuf,
    options: CatalogOptions,
    cell: OnceCell<Arc<Catalog>>,
    loads: AtomicUsize,
}

impl Inner {
    async fn get(&self) -> Result<Arc<Catalog>, CatalogLoadError> {
        self.cell
            .get_or_try_init(|| async {
                self.loads.fetch_add(1, Ordering::SeqCst);
                let root = self.root.clone();
                let options = self.options.clone();

                let catalog = tokio::task::spawn_blocking(move || load_all(&root, &options))
                    .await
                    .map_err(|e| CatalogLoadError::Interrupted(e.to_string()))??;

                Ok::<_, CatalogLoadError>(Arc::new(catalog))
            })
            .await
            .cloned()
    }
}

impl CatalogCache {
    /// Create an empty cache for the content under `root`.
    pub fn new(root: impl Into<PathBuf>, options: CatalogOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                root: root.into(),
                options,
                cell: OnceCell::new(),
                loads: AtomicUsize::new(0),
            }),
        }
    }

    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Get the catalog, loading it if this is the first access.
    ///
    /// The filesystem walk runs on the blocking thread pool. Waiting happens
    /// in a spawned task that owns its own handle on the cache, so dropping
    /// this future leaves the load running for the next caller.
    pub async fn get(&self) -> Result<Arc<Catalog>, CatalogLoadError> {
        if let Some(catalog) = self.inner.cell.get() {
            return Ok(Arc::clone(catalog));
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.get().await })
            .await
            .map_err(|e| CatalogLoadError::Interrupted(e.to_string()))?
    }

    /// The catalog if it has already been loaded. Never starts a load.
    pub fn loaded(&self) -> Option<Arc<Catalog>> {
        self.inner.cell.get().cloned()
    }

    /// Number of loads started so far.
    pub fn load_count(&self) -> usize {
        self.inner.loads.load(Ordering::SeqCst)
    }
}
