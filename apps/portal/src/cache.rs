//! Query cache keyed by `(procedure, input)`.
//!
//! Owned by [`crate::state::PortalState`] and handed to every flow that
//! reads or mutates remote data. Mutations invalidate by procedure name,
//! optionally narrowed by a partial input.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::PortalError;

#[derive(Debug, Clone)]
struct CacheEntry {
    procedure: String,
    input: Value,
    data: Value,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Bumped on every invalidation of a procedure.
    generations: HashMap<String, u64>,
}

#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    inner: Arc<Mutex<CacheInner>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get<I, T>(&self, procedure: &str, input: &I) -> Option<T>
    where
        I: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (key, _) = cache_key(procedure, input).ok()?;
        let data = self.lock().entries.get(&key).map(|e| e.data.clone())?;
        match serde_json::from_value(data) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Discarding cached {procedure} entry of unexpected shape: {e}");
                None
            }
        }
    }

    pub fn insert<I, T>(&self, procedure: &str, input: &I, data: &T) -> Result<(), PortalError>
    where
        I: Serialize + ?Sized,
        T: Serialize,
    {
        let (key, input) = cache_key(procedure, input)?;
        let data = serde_json::to_value(data)?;
        self.lock().entries.insert(
            key,
            CacheEntry {
                procedure: procedure.to_string(),
                input,
                data,
            },
        );
        Ok(())
    }

    /// Returns the cached result for this query, or runs `fetch` and caches it.
    /// Failed fetches are not cached.
    pub async fn fetch<I, T, F, Fut>(
        &self,
        procedure: &str,
        input: &I,
        fetch: F,
    ) -> Result<T, PortalError>
    where
        I: Serialize + ?Sized,
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, PortalError>>,
    {
        if let Some(hit) = self.get(procedure, input) {
            debug!("Cache hit for {procedure}");
            return Ok(hit);
        }
        let data = fetch().await?;
        self.insert(procedure, input, &data)?;
        Ok(data)
    }

    /// Drops every cached result of `procedure`. Returns how many were dropped.
    pub fn invalidate(&self, procedure: &str) -> usize {
        self.retain(procedure, |entry| entry.procedure != procedure)
    }

    /// Drops cached results of `procedure` whose input contains every field
    /// of `partial` with an equal value.
    pub fn invalidate_matching<P>(&self, procedure: &str, partial: &P) -> usize
    where
        P: Serialize + ?Sized,
    {
        let Ok(partial) = serde_json::to_value(partial) else {
            return self.invalidate(procedure);
        };
        self.retain(procedure, |entry| {
            entry.procedure != procedure || !contains(&entry.input, &partial)
        })
    }

    /// Invalidation count of `procedure`. Holders of data fetched outside the
    /// cache compare it to notice that their copy is stale.
    pub fn generation(&self, procedure: &str) -> u64 {
        self.lock().generations.get(procedure).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn retain(&self, procedure: &str, keep: impl Fn(&CacheEntry) -> bool) -> usize {
        let mut inner = self.lock();
        *inner.generations.entry(procedure.to_string()).or_default() += 1;
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| keep(entry));
        let dropped = before - inner.entries.len();
        if dropped > 0 {
            debug!("Invalidated {dropped} cached queries");
        }
        dropped
    }
}

fn cache_key<I: Serialize + ?Sized>(
    procedure: &str,
    input: &I,
) -> Result<(String, Value), PortalError> {
    let input = serde_json::to_value(input)?;
    // serde_json objects are key-ordered, so this string is canonical.
    Ok((format!("{procedure}:{input}"), input))
}

fn contains(input: &Value, partial: &Value) -> bool {
    match (input, partial) {
        (Value::Object(input), Value::Object(partial)) => partial
            .iter()
            .all(|(k, v)| input.get(k).is_some_and(|iv| contains(iv, v))),
        _ => input == partial,
    }
}
