// Flow identifiers - one random id per test or step identity

use crate::model::FlowKey;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Flow id table. Grows for the whole run, never pruned.
#[derive(Debug, Default)]
pub struct FlowIds {
    ids: Mutex<HashMap<FlowKey, String>>,
}

impl FlowIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flow id for `key`, minted on first use
    pub fn get_or_create(&self, key: &FlowKey) -> String {
        let mut ids = self.ids.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(id) = ids.get(key) {
            return id.clone();
        }

        let id = Uuid::new_v4().to_string();
        ids.insert(key.clone(), id.clone());
        id
    }

    pub fn len(&self) -> usize {
        self.ids.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
