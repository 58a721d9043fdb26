//! Lazily resolved flattening capability
//!
//! Widgets receive a [`LazyFlattener`] instead of a concrete flattener. The
//! loader future runs on the first [`LazyFlattener::resolve`] and its result
//! is shared by every clone afterwards. Until then only static output that
//! needs no path geometry is available.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::error::SvgError;
use crate::flatten::{LyonFlattener, PathFlattener};

type LoadFuture = Pin<Box<dyn Future<Output = Result<Arc<dyn PathFlattener>, SvgError>> + Send>>;
type Loader = Box<dyn Fn() -> LoadFuture + Send + Sync>;

struct LazyInner {
    loader: Loader,
    cell: OnceCell<Arc<dyn PathFlattener>>,
}

/// A path flattener that is loaded on first use
///
/// Cloning is cheap; clones share the loaded flattener.
#[derive(Clone)]
pub struct LazyFlattener {
    inner: Arc<LazyInner>,
}

impl LazyFlattener {
    /// Create from a loader; it may run again if a previous load failed
    pub fn new<F, Fut>(loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<dyn PathFlattener>, SvgError>> + Send + 'static,
    {
        Self {
            inner: Arc::new(LazyInner {
                loader: Box::new(move || -> LoadFuture { Box::pin(loader()) }),
                cell: OnceCell::new(),
            }),
        }
    }

    /// A lazily constructed [`LyonFlattener`]
    pub fn lyon(tolerance: f32) -> Self {
        Self::new(move || async move {
            tracing::debug!(tolerance, "loading lyon flattener");
            Ok(Arc::new(LyonFlattener::new(tolerance)) as Arc<dyn PathFlattener>)
        })
    }

    /// Wrap an existing flattener
    pub fn ready(flattener: Arc<dyn PathFlattener>) -> Self {
        Self::new(move || {
            let flattener = Arc::clone(&flattener);
            async move { Ok(flattener) }
        })
    }

    /// Whether the loader has completed successfully
    pub fn is_resolved(&self) -> bool {
        self.inner.cell.initialized()
    }

    /// The loaded flattener, if resolved
    pub fn get(&self) -> Option<Arc<dyn PathFlattener>> {
        self.inner.cell.get().cloned()
    }

    /// Load the flattener if needed and return it
    pub async fn resolve(&self) -> Result<Arc<dyn PathFlattener>, SvgError> {
        self.inner
            .cell
            .get_or_try_init(|| (self.inner.loader)())
            .await
            .cloned()
    }
}

impl Default for LazyFlattener {
    fn default() -> Self {
        Self::lyon(crate::flatten::DEFAULT_TOLERANCE)
    }
}

impl std::fmt::Debug for LazyFlattener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyFlattener")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_resolves_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let lazy = LazyFlattener::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(Arc::new(LyonFlattener::default()) as Arc<dyn PathFlattener>) }
        });

        assert!(!lazy.is_resolved());
        assert!(lazy.get().is_none());

        let clone = lazy.clone();
        pollster::block_on(lazy.resolve()).unwrap();
        pollster::block_on(clone.resolve()).unwrap();

        assert!(lazy.is_resolved());
        assert!(clone.is_resolved());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_retries() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let lazy = LazyFlattener::new(move || {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(SvgError::Unsupported("not yet".into()))
                } else {
                    Ok(Arc::new(LyonFlattener::default()) as Arc<dyn PathFlattener>)
                }
            }
        });

        assert!(pollster::block_on(lazy.resolve()).is_err());
        assert!(!lazy.is_resolved());
        assert!(pollster::block_on(lazy.resolve()).is_ok());
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_resolved_flattener_works() {
        let lazy = LazyFlattener::lyon(0.1);
        let flattener = pollster::block_on(lazy.resolve()).unwrap();
        let line = flattener.flatten("M0,0 L3,4").unwrap();
        assert!((line.length() - 5.0).abs() < 1e-6);
    }
}
