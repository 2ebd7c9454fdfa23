//! Client-side lookup cache.
//!
//! The "my submissions" screen remembers the last company searched and the
//! last result per company. The cache is an injected key/value client, never
//! ambient global state, so it can be swapped for tests.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::submission::Submission;

pub const LAST_COMPANY_KEY: &str = "sc:lastCompanyName";
const ANONYMOUS: &str = "anonymous";

/// JSON key/value store. Writes are best effort and never fail the caller.
pub trait KeyValueCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}

fn company_slot(company: &str) -> &str {
    match company.trim() {
        "" => ANONYMOUS,
        trimmed => trimmed,
    }
}

pub fn submissions_key(company: &str) -> String {
    format!("sc:submissions:{}", company_slot(company))
}

pub fn searched_key(company: &str) -> String {
    format!("sc:searched:{}", company_slot(company))
}

/// Typed access to the lookup entries of a [`KeyValueCache`].
pub struct LookupCache<C> {
    cache: C,
}

impl<C: KeyValueCache> LookupCache<C> {
    pub fn new(cache: C) -> Self {
        Self { cache }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.cache
            .get(key)
            .and_then(|v| serde_json::from_value(v).ok())
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) {
        if let Ok(v) = serde_json::to_value(value) {
            self.cache.set(key, v);
        }
    }

    /// Last company searched, empty when none.
    pub fn last_company(&self) -> String {
        self.read(LAST_COMPANY_KEY).unwrap_or_default()
    }

    /// Remember `company` unless it is blank.
    pub fn remember_company(&self, company: &str) {
        let company = company.trim();
        if !company.is_empty() {
            self.write(LAST_COMPANY_KEY, &company);
        }
    }

    pub fn submissions(&self, company: &str) -> Vec<Submission> {
        self.read(&submissions_key(company)).unwrap_or_default()
    }

    pub fn searched(&self, company: &str) -> bool {
        self.read(&searched_key(company)).unwrap_or(false)
    }

    /// Store a successful lookup result.
    pub fn store_result(&self, company: &str, submissions: &[Submission]) {
        self.write(&submissions_key(company), &submissions);
        self.mark_searched(company);
    }

    /// A failed lookup still counts as searched.
    pub fn mark_searched(&self, company: &str) {
        self.write(&searched_key(company), &true);
    }

    pub fn clear(&self, company: &str) {
        self.cache.remove(&submissions_key(company));
        self.cache.remove(&searched_key(company));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn submission() -> Submission {
        let now = Utc::now();
        Submission {
            id: 7,
            portfolio_id: 1,
            company_name: "스테이".into(),
            pin_hash: "secret".into(),
            responses: json!({"1": "서울"}),
            is_draft: true,
            completed_at: None,
            ip_address: Some("10.0.0.1".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn keys_use_trimmed_company_or_anonymous() {
        assert_eq!(submissions_key(" 스테이 "), "sc:submissions:스테이");
        assert_eq!(searched_key(""), "sc:searched:anonymous");
    }

    #[test]
    fn last_company_ignores_blank() {
        let cache = LookupCache::new(MemoryCache::new());
        assert_eq!(cache.last_company(), "");
        cache.remember_company(" 스테이 ");
        cache.remember_company("   ");
        assert_eq!(cache.last_company(), "스테이");
    }

    #[test]
    fn stored_results_never_carry_the_pin_hash() {
        let cache = LookupCache::new(MemoryCache::new());
        assert!(!cache.searched("스테이"));
        cache.store_result("스테이", &[submission()]);

        let cached = cache.submissions("스테이");
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].id, 7);
        assert!(cached[0].pin_hash.is_empty());
        assert!(cache.searched("스테이"));

        cache.clear("스테이");
        assert!(cache.submissions("스테이").is_empty());
        assert!(!cache.searched("스테이"));
    }
}
