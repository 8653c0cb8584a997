//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! - **Catalog**: loaded once at startup, immutable, shared by every session.
//! - **Sessions**: one [`CompletionState`] per audit session, keyed by UUID.
//!   Nothing is persisted; a session lives until it is deleted, sits idle
//!   longer than [`AppConfig::session_ttl`], or the process exits.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use dpdp_core::{Catalog, CatalogError};
use dpdp_state::CompletionState;

// -- Configuration ------------------------------------------------------------

/// Environment variable naming the listen port.
pub const PORT_VAR: &str = "PORT";

/// Environment variable naming a catalog YAML file to serve instead of the
/// embedded reference catalog.
pub const CATALOG_VAR: &str = "DPDP_CATALOG";

/// Environment variable giving the idle-session lifetime in seconds.
/// `0` disables expiry.
pub const SESSION_TTL_VAR: &str = "DPDP_SESSION_TTL_SECS";

/// Idle-session lifetime when `DPDP_SESSION_TTL_SECS` is unset.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Upper bound on the time between expiry sweeps.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listen port.
    pub port: u16,
    /// Catalog file; `None` serves the embedded reference catalog.
    pub catalog_path: Option<PathBuf>,
    /// Sessions not updated for this long are dropped; `None` keeps them
    /// until deleted.
    pub session_ttl: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            catalog_path: None,
            session_ttl: Some(DEFAULT_SESSION_TTL),
        }
    }
}

impl AppConfig {
    /// Build configuration from `PORT`, `DPDP_CATALOG` and
    /// `DPDP_SESSION_TTL_SECS`.
    ///
    /// An unset or unparseable `PORT` falls back to 8080; likewise the
    /// session lifetime falls back to 24 hours.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup(PORT_VAR)
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let catalog_path = lookup(CATALOG_VAR)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let ttl_secs = lookup(SESSION_TTL_VAR).and_then(|s| s.trim().parse::<u64>().ok());
        let session_ttl = match ttl_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_SESSION_TTL),
        };
        Self {
            port,
            catalog_path,
            session_ttl,
        }
    }

    /// How often the idle-session sweep runs, if expiry is enabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        self.session_ttl
            .map(|ttl| ttl.clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL))
    }

    /// Load the configured catalog.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => Catalog::load(path),
            None => Catalog::reference(),
        }
    }
}

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// The lock is `parking_lot` and is never held across `.await` points.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// Read a record in place without cloning it.
    pub fn read<R>(&self, id: &Uuid, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.data.read().get(id).map(f)
    }

    /// Atomically read-validate-update a record.
    ///
    /// The closure runs under a single write lock, so concurrent updates of
    /// the same record are serialized. Returns `None` if the record doesn't
    /// exist, or `Some(result)` with the closure's `Result`.
    pub fn try_update<R, E>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    /// Remove a record by ID.
    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Drop every record for which `keep` returns false, returning the
    /// removed IDs.
    pub fn retain(&self, mut keep: impl FnMut(&T) -> bool) -> Vec<Uuid> {
        let mut removed = Vec::new();
        self.data.write().retain(|id, value| {
            let kept = keep(value);
            if !kept {
                removed.push(*id);
            }
            kept
        });
        removed
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Session Records ----------------------------------------------------------

/// One audit session.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionRecord {
    pub id: Uuid,
    /// Section key (`chapterId-number`) to audited flag.
    #[schema(value_type = Object)]
    pub state: CompletionState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    /// A fresh all-pending session for `catalog`.
    pub fn new(catalog: &Catalog) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            state: CompletionState::initialize(catalog),
            created_at: now,
            updated_at: now,
        }
    }
}

// -- Application State --------------------------------------------------------

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub sessions: Store<SessionRecord>,
    pub config: AppConfig,
}

impl AppState {
    /// State serving `catalog` with default configuration.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_config(catalog, AppConfig::default())
    }

    /// State serving `catalog` with explicit configuration.
    pub fn with_config(catalog: Catalog, config: AppConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions: Store::new(),
            config,
        }
    }

    /// Drop sessions whose last update is older than the configured
    /// lifetime, returning how many were removed.
    pub fn expire_idle_sessions(&self, now: DateTime<Utc>) -> usize {
        let Some(ttl) = self.config.session_ttl else {
            return 0;
        };
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return 0;
        };
        let Some(cutoff) = now.checked_sub_signed(ttl) else {
            return 0;
        };
        let removed = self.sessions.retain(|record| record.updated_at >= cutoff);
        for id in &removed {
            tracing::info!(session = %id, "idle session expired");
        }
        removed.len()
    }
}
