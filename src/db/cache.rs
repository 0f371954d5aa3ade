use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct CachedRows {
    rows: Arc<Vec<Value>>,
    stored_at: Instant,
}

/// 参考数据缓存 (商品、供应商、事业部等)，按集合名存原始行
///
/// TTL 为 0 时不缓存，每次请求都重新拉取。
pub struct ReferenceCache {
    ttl: Duration,
    entries: DashMap<String, CachedRows>,
}

impl ReferenceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn get(&self, collection: &str) -> Option<Arc<Vec<Value>>> {
        if !self.is_enabled() {
            return None;
        }

        // 读锁必须在 remove 之前释放
        {
            let entry = self.entries.get(collection)?;
            if entry.stored_at.elapsed() < self.ttl {
                return Some(Arc::clone(&entry.rows));
            }
        }

        self.evict_if_expired(collection);
        None
    }

    /// 删除前重新判断过期，并发写入的新条目保留
    fn evict_if_expired(&self, collection: &str) {
        self.entries
            .remove_if(collection, |_, entry| entry.stored_at.elapsed() >= self.ttl);
    }

    pub fn insert(&self, collection: &str, rows: Vec<Value>) {
        if !self.is_enabled() {
            return;
        }
        self.entries.insert(
            collection.to_string(),
            CachedRows {
                rows: Arc::new(rows),
                stored_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
