//! Shared engine context: configuration, Zobrist tables and the memo cache.
//!
//! Every `Position` holds an `Arc<EngineContext>`; clones of a position share
//! it. `EngineContext::shared()` is the lazily-built process default used by
//! the convenience constructors. Independent contexts (another seed, a small
//! cache) can be built for tests or isolated searches.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::config::EngineConfig;
use crate::hashing::position_cache::PositionCache;
use crate::hashing::zobrist::ZobristKeys;

static SHARED_CONTEXT: OnceLock<Arc<EngineContext>> = OnceLock::new();

pub struct EngineContext {
    config: EngineConfig,
    zobrist: ZobristKeys,
    cache: PositionCache,
}

impl EngineContext {
    pub fn new(config: EngineConfig) -> Self {
        debug!(
            cache_capacity = config.cache_capacity,
            zobrist_seed = config.zobrist_seed,
            "building engine context"
        );
        Self {
            zobrist: ZobristKeys::from_seed(config.zobrist_seed),
            cache: PositionCache::with_capacity(config.cache_capacity),
            config,
        }
    }

    /// Process-wide default context, configured from the environment on
    /// first use.
    pub fn shared() -> Arc<EngineContext> {
        Arc::clone(SHARED_CONTEXT.get_or_init(|| Arc::new(Self::new(EngineConfig::from_env()))))
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn zobrist(&self) -> &ZobristKeys {
        &self.zobrist
    }

    #[inline]
    pub fn cache(&self) -> &PositionCache {
        &self.cache
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineContext")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::EngineContext;
    use crate::config::EngineConfig;

    #[test]
    fn shared_context_is_a_singleton() {
        let a = EngineContext::shared();
        let b = EngineContext::shared();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn custom_context_uses_its_own_cache_bound() {
        let context = EngineContext::new(EngineConfig::default().with_cache_capacity(32));
        assert_eq!(context.cache().capacity(), 32);
        assert!(context.cache().is_empty());
    }
}
