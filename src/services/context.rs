use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LookupValue {
    Text(String),
    Bytes(Vec<u8>),
    Records(Vec<Value>),
}

impl LookupValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            LookupValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_records(&self) -> Option<&[Value]> {
        match self {
            LookupValue::Records(records) => Some(records),
            _ => None,
        }
    }
}

pub trait LookupContext: Send + Sync {
    fn has_cached(&self, key: &str) -> bool;
    fn cached_value(&self, key: &str) -> Option<LookupValue>;
    fn cache(&self, key: &str, value: LookupValue) -> LookupValue;
}

#[derive(Default)]
pub struct MemoryContext {
    entries: Mutex<HashMap<String, LookupValue>>,
}

impl MemoryContext {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LookupContext for MemoryContext {
    fn has_cached(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    fn cached_value(&self, key: &str) -> Option<LookupValue> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn cache(&self, key: &str, value: LookupValue) -> LookupValue {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.clone());
        }
        value
    }
}
