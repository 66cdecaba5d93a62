//! Memoization of described parameter lists. Describing a target is cheap compared to reflection in
//! dynamic languages, but parameter lists are rebuilt on every call to a descriptor, so the
//! [Resolver](crate::resolver::Resolver) keeps them in a [PoolStorage] keyed by a unique target
//! name and a [PoolCategory].
//!
//! Storages are pure caches - absent and expired entries are indistinguishable, and losing a write
//! only costs recomputation.

use crate::descriptor::ParameterList;
use crate::instance::InstancePtr;
use fxhash::FxHashMap;
#[cfg(test)]
use mockall::automock;
use std::fmt::{Display, Formatter};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::trace;

/// Kind of target a cached parameter list belongs to.
#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum PoolCategory {
    Constructor,
    Method,
    Function,
}

impl PoolCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolCategory::Constructor => "constructor",
            PoolCategory::Method => "method",
            PoolCategory::Function => "function",
        }
    }
}

impl Display for PoolCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache for described parameter lists.
#[cfg_attr(test, automock)]
pub trait PoolStorage {
    /// Returns a cached list, if present and not expired.
    fn get(&self, unique: &str, category: PoolCategory) -> Option<ParameterList>;

    /// Stores a list, replacing any previous one.
    fn set(&self, unique: &str, category: PoolCategory, parameters: ParameterList);
}

#[cfg(not(feature = "threadsafe"))]
pub type PoolStoragePtr = InstancePtr<dyn PoolStorage>;
#[cfg(feature = "threadsafe")]
pub type PoolStoragePtr = InstancePtr<dyn PoolStorage + Send + Sync>;

type PoolKey = (PoolCategory, String);

/// Process-local, in-memory storage. Can be seeded with precomputed entries.
#[derive(Debug, Default)]
pub struct ArrayPoolStorage {
    entries: RwLock<FxHashMap<PoolKey, ParameterList>>,
}

impl ArrayPoolStorage {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage with given initial entries.
    pub fn with_entries<U, I>(entries: I) -> Self
    where
        U: Into<String>,
        I: IntoIterator<Item = (U, PoolCategory, ParameterList)>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(unique, category, parameters)| ((category, unique.into()), parameters))
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .map(|entries| entries.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PoolStorage for ArrayPoolStorage {
    fn get(&self, unique: &str, category: PoolCategory) -> Option<ParameterList> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(&(category, unique.to_string())).cloned())
    }

    fn set(&self, unique: &str, category: PoolCategory, parameters: ParameterList) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert((category, unique.to_string()), parameters);
        }
    }
}

#[derive(Debug)]
struct SharedEntry {
    parameters: ParameterList,
    expires_at: Instant,
}

type SharedPool = InstancePtr<RwLock<FxHashMap<String, SharedEntry>>>;

/// Two-level storage: a local in-memory layer in front of a pool shared between all handles
/// created with [SharedPoolStorage::share]. Shared entries expire after a configurable time to
/// live.
#[derive(Debug)]
pub struct SharedPoolStorage {
    local: ArrayPoolStorage,
    shared: SharedPool,
    ttl: Duration,
}

impl Default for SharedPoolStorage {
    fn default() -> Self {
        Self {
            local: Default::default(),
            shared: Default::default(),
            ttl: Self::DEFAULT_TTL,
        }
    }
}

impl SharedPoolStorage {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(1800);

    pub const KEY_PREFIX: &'static str = "wireup-di";

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time to live for new shared entries. Zero resets to [Self::DEFAULT_TTL].
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = if ttl.is_zero() {
            Self::DEFAULT_TTL
        } else {
            ttl
        };
        self
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Creates a new handle with an empty local layer, backed by the same shared pool.
    pub fn share(&self) -> Self {
        Self {
            local: Default::default(),
            shared: self.shared.clone(),
            ttl: self.ttl,
        }
    }

    fn key(unique: &str, category: PoolCategory) -> String {
        format!("{}:{category}:{unique}", Self::KEY_PREFIX)
    }
}

impl PoolStorage for SharedPoolStorage {
    fn get(&self, unique: &str, category: PoolCategory) -> Option<ParameterList> {
        if let Some(parameters) = self.local.get(unique, category) {
            return Some(parameters);
        }

        let key = Self::key(unique, category);
        let parameters = self.shared.read().ok().and_then(|shared| {
            shared
                .get(&key)
                .filter(|entry| entry.expires_at > Instant::now())
                .map(|entry| entry.parameters.clone())
        })?;

        self.local.set(unique, category, parameters.clone());
        Some(parameters)
    }

    fn set(&self, unique: &str, category: PoolCategory, parameters: ParameterList) {
        self.local.set(unique, category, parameters.clone());

        let key = Self::key(unique, category);
        match self.shared.write() {
            Ok(mut shared) => {
                let now = Instant::now();
                shared.retain(|_, entry| entry.expires_at > now);
                shared.insert(
                    key,
                    SharedEntry {
                        parameters,
                        expires_at: now + self.ttl,
                    },
                );
            }
            Err(_) => trace!(key = %key, "Shared pool unavailable - skipping write."),
        }
    }
}
