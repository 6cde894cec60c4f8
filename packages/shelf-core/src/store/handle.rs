//! Lazily opened, process-wide store handle.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::{ShelfError, StoreError};

type Opener<S> = Box<dyn Fn() -> Result<Arc<S>, StoreError> + Send + Sync>;

/// Initialization state of a [`StoreHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Uninitialized,
    Ready,
    Failed,
}

/// Store connection opened on first use and shared for the life of the
/// process.
///
/// The opener runs at most once. If it fails, the error is kept and every
/// later [`get`](StoreHandle::get) re-signals it without retrying.
pub struct StoreHandle<S: ?Sized> {
    name: &'static str,
    cell: OnceLock<Result<Arc<S>, StoreError>>,
    opener: Opener<S>,
}

impl<S: ?Sized + Send + Sync + 'static> StoreHandle<S> {
    /// Creates a handle that runs `opener` on first use.
    pub fn lazy<F>(name: &'static str, opener: F) -> Self
    where
        F: Fn() -> Result<Arc<S>, StoreError> + Send + Sync + 'static,
    {
        Self {
            name,
            cell: OnceLock::new(),
            opener: Box::new(opener),
        }
    }

    /// Creates a handle around an already opened store.
    pub fn ready(name: &'static str, store: Arc<S>) -> Self {
        let handle = Self::lazy(name, move || Ok(Arc::clone(&store)));
        let _ = handle.get();
        handle
    }

    /// Returns the store, opening it if this is the first call.
    pub fn get(&self) -> Result<Arc<S>, ShelfError> {
        let state = self.cell.get_or_init(|| {
            let result = (self.opener)();
            match &result {
                Ok(_) => tracing::info!("{} store initialized", self.name),
                Err(e) => tracing::error!("{} store initialization failed: {}", self.name, e),
            }
            result
        });

        match state {
            Ok(store) => Ok(Arc::clone(store)),
            Err(e) => Err(ShelfError::StoreInit {
                store: self.name,
                message: e.to_string(),
            }),
        }
    }

    /// Current initialization state.
    pub fn state(&self) -> HandleState {
        match self.cell.get() {
            None => HandleState::Uninitialized,
            Some(Ok(_)) => HandleState::Ready,
            Some(Err(_)) => HandleState::Failed,
        }
    }
}

impl<S: ?Sized> fmt::Debug for StoreHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.cell.get() {
            None => HandleState::Uninitialized,
            Some(Ok(_)) => HandleState::Ready,
            Some(Err(_)) => HandleState::Failed,
        };
        f.debug_struct("StoreHandle")
            .field("name", &self.name)
            .field("state", &state)
            .finish()
    }
}
