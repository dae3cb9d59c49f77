// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use bytes::Bytes;
use flowbridge_core::Result;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

/// TokenStore persists one access token per conversation session.
///
/// The store only sees opaque bytes: encoding and validation belong to the
/// [`TokenCache`](crate::TokenCache). `set` overwrites any previous value.
#[async_trait::async_trait]
pub trait TokenStore: Debug + Send + Sync + 'static {
    /// Load the value stored for `session_id`.
    ///
    /// - Returns `Ok(Some(v))` if a value is found.
    /// - Returns `Ok(None)` if nothing was stored yet.
    async fn get(&self, session_id: &str) -> Result<Option<Bytes>>;

    /// Store `value` for `session_id`, replacing the previous one.
    async fn set(&self, session_id: &str, value: Bytes) -> Result<()>;
}

/// In-process [`TokenStore`] backed by a `HashMap`.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions holding a value.
    pub fn len(&self) -> usize {
        self.tokens.lock().expect("lock poisoned").len()
    }

    /// Check if the store holds no value.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, session_id: &str) -> Result<Option<Bytes>> {
        Ok(self
            .tokens
            .lock()
            .expect("lock poisoned")
            .get(session_id)
            .cloned())
    }

    async fn set(&self, session_id: &str, value: Bytes) -> Result<()> {
        self.tokens
            .lock()
            .expect("lock poisoned")
            .insert(session_id.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_overwrites() -> Result<()> {
        let store = MemoryTokenStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("s1").await?, None);

        store.set("s1", Bytes::from_static(b"first")).await?;
        store.set("s1", Bytes::from_static(b"second")).await?;
        store.set("s2", Bytes::from_static(b"other")).await?;

        let shared = store.clone();
        assert_eq!(shared.get("s1").await?, Some(Bytes::from_static(b"second")));
        assert_eq!(shared.len(), 2);
        Ok(())
    }
}
