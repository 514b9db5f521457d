// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Key a task's returned value is stored under.
pub const RETURN_VALUE_KEY: &str = "return_value";
/// Key the activated-source task pushes the selected identifier under.
pub const ACTIVATED_SOURCE_KEY: &str = "activated_source";

/// `(task_id, key)`
pub type HandoffKey = (String, String);

/// Small values passed between tasks of one DAG run.
///
/// A store is created for each run and shared by cloning the handle; values
/// never outlive the run that produced them.
#[derive(Debug, Clone, Default)]
pub struct HandoffStore {
    slots: Arc<Mutex<BTreeMap<HandoffKey, Value>>>,
}

impl HandoffStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` for `(task_id, key)`, replacing any previous value.
    pub async fn push(&self, task_id: &str, key: &str, value: Value) {
        let mut slots = self.slots.lock().await;
        slots.insert((task_id.to_string(), key.to_string()), value);
    }

    pub async fn pull(&self, task_id: &str, key: &str) -> Option<Value> {
        let slots = self.slots.lock().await;
        slots
            .get(&(task_id.to_string(), key.to_string()))
            .cloned()
    }

    /// Drop every value `task_id` pushed, so a retried try starts clean.
    pub async fn clear_task(&self, task_id: &str) {
        let mut slots = self.slots.lock().await;
        slots.retain(|(owner, _), _| owner != task_id);
    }

    /// Copy of every stored value, ordered by task id then key.
    pub async fn snapshot(&self) -> BTreeMap<HandoffKey, Value> {
        self.slots.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_push_then_pull() {
        let store = HandoffStore::new();
        store
            .push("hook_task", ACTIVATED_SOURCE_KEY, json!("reddit"))
            .await;

        assert_eq!(
            store.pull("hook_task", ACTIVATED_SOURCE_KEY).await,
            Some(json!("reddit"))
        );
    }

    #[tokio::test]
    async fn test_pull_is_scoped_by_task_and_key() {
        let store = HandoffStore::new();
        store
            .push("hook_task", ACTIVATED_SOURCE_KEY, json!("reddit"))
            .await;

        assert_eq!(store.pull("hook_task", RETURN_VALUE_KEY).await, None);
        assert_eq!(store.pull("other_task", ACTIVATED_SOURCE_KEY).await, None);
    }

    #[tokio::test]
    async fn test_push_overwrites() {
        let store = HandoffStore::new();
        store.push("t", "k", json!(1)).await;
        store.push("t", "k", json!(2)).await;

        assert_eq!(store.len().await, 1);
        assert_eq!(store.pull("t", "k").await, Some(json!(2)));
    }

    #[tokio::test]
    async fn test_clear_task_only_drops_that_task() {
        let store = HandoffStore::new();
        store.push("hook_task", ACTIVATED_SOURCE_KEY, json!("stale")).await;
        store.push("hook_task", RETURN_VALUE_KEY, json!(1)).await;
        store.push("start_task", RETURN_VALUE_KEY, json!(2)).await;

        store.clear_task("hook_task").await;

        assert_eq!(store.len().await, 1);
        assert_eq!(store.pull("hook_task", ACTIVATED_SOURCE_KEY).await, None);
        assert_eq!(store.pull("start_task", RETURN_VALUE_KEY).await, Some(json!(2)));
    }

    #[tokio::test]
    async fn test_clones_share_slots() {
        let store = HandoffStore::new();
        let writer = store.clone();
        tokio::spawn(async move { writer.push("t", "k", json!(true)).await })
            .await
            .unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(
            snapshot.get(&("t".to_string(), "k".to_string())),
            Some(&json!(true))
        );
    }

    #[tokio::test]
    async fn test_separate_stores_are_isolated() {
        let first = HandoffStore::new();
        let second = HandoffStore::new();
        first.push("t", "k", json!("x")).await;

        assert!(second.is_empty().await);
    }
}
