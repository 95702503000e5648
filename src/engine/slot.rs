use std::fmt;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use tracing::info;

/// When a slot loads and releases its engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// Load up front and keep the engine for every request.
    Eager,
    /// Load per request and release right after, freeing model memory between requests.
    #[default]
    Lazy,
}

/// Health view of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Loaded,
    LazyLoaded,
    NotLoaded,
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EngineStatus::Loaded => "loaded",
            EngineStatus::LazyLoaded => "lazy_loaded",
            EngineStatus::NotLoaded => "not_loaded",
        };
        f.write_str(label)
    }
}

/// Owns at most one loaded engine and hands it to request handlers.
pub struct EngineSlot<E, L> {
    policy: LoadPolicy,
    loader: L,
    engine: Option<E>,
    loads: usize,
}

impl<E, L> EngineSlot<E, L>
where
    L: FnMut() -> Result<E>,
{
    /// Creates the slot; an eager slot loads immediately and fails if loading fails.
    pub fn new(policy: LoadPolicy, loader: L) -> Result<Self> {
        let mut slot = Self {
            policy,
            loader,
            engine: None,
            loads: 0,
        };
        if policy == LoadPolicy::Eager {
            slot.acquire()?;
        }
        Ok(slot)
    }

    /// Runs `f` against the engine, loading it first if needed.
    ///
    /// Under [`LoadPolicy::Lazy`] the engine is released afterwards whether or
    /// not `f` succeeded.
    pub fn with_engine<R>(&mut self, f: impl FnOnce(&E) -> Result<R>) -> Result<R> {
        let outcome = match self.acquire() {
            Ok(engine) => f(engine),
            Err(err) => Err(err),
        };
        if self.policy == LoadPolicy::Lazy {
            self.release();
        }
        outcome
    }

    pub fn status(&self) -> EngineStatus {
        match (&self.engine, self.policy) {
            (Some(_), _) => EngineStatus::Loaded,
            (None, LoadPolicy::Lazy) => EngineStatus::LazyLoaded,
            (None, LoadPolicy::Eager) => EngineStatus::NotLoaded,
        }
    }

    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    /// How many times the loader has run.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    /// Drops the loaded engine, if any.
    pub fn release(&mut self) {
        if self.engine.take().is_some() {
            info!("speech engine released");
        }
    }

    fn acquire(&mut self) -> Result<&E> {
        if self.engine.is_none() {
            info!(policy = ?self.policy, "loading speech engine");
            let engine = (self.loader)().context("failed to load speech engine")?;
            self.loads += 1;
            self.engine = Some(engine);
        }
        self.engine
            .as_ref()
            .context("speech engine missing after load")
    }
}
