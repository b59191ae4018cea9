use crate::domain::value_objects::{CatalogEntryId, MemberId};
use crate::ports::interest_queue::{InterestQueue as InterestQueueTrait, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// InterestQueueのインメモリ実装
///
/// カタログ項目IDごとに会員IDの集合を1つのMutexの下で保持する。
/// drainは1回のロック区間でエントリ全体を取り外すため原子的：
/// 並行するdrainが同じ集合を観測することはない。
#[allow(dead_code)]
pub struct InterestQueue {
    sets: Mutex<HashMap<CatalogEntryId, HashSet<MemberId>>>,
}

#[allow(dead_code)]
impl InterestQueue {
    pub fn new() -> Self {
        Self {
            sets: Mutex::new(HashMap::new()),
        }
    }

    /// テスト用：登録済みの会員集合を覗く（クリアしない）
    pub fn peek(&self, key: CatalogEntryId) -> HashSet<MemberId> {
        self.sets.lock().unwrap().get(&key).cloned().unwrap_or_default()
    }
}

impl Default for InterestQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InterestQueueTrait for InterestQueue {
    /// 冪等な追加（HashSetのinsertがそのまま冪等性を与える）
    async fn add_member(&self, key: CatalogEntryId, member_id: MemberId) -> Result<()> {
        self.sets
            .lock()
            .unwrap()
            .entry(key)
            .or_default()
            .insert(member_id);
        Ok(())
    }

    async fn remove_member(&self, key: CatalogEntryId, member_id: MemberId) -> Result<()> {
        let mut sets = self.sets.lock().unwrap();
        if let Some(members) = sets.get_mut(&key) {
            members.remove(&member_id);
            if members.is_empty() {
                sets.remove(&key);
            }
        }
        Ok(())
    }

    async fn key_exists(&self, key: CatalogEntryId) -> Result<bool> {
        let sets = self.sets.lock().unwrap();
        Ok(sets.get(&key).is_some_and(|m| !m.is_empty()))
    }

    /// 原子的drain：1回のロック区間でエントリを取り外す
    async fn drain(&self, key: CatalogEntryId) -> Result<HashSet<MemberId>> {
        Ok(self.sets.lock().unwrap().remove(&key).unwrap_or_default())
    }
}
