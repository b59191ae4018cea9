#![allow(dead_code)]

use rusty_game_rental::adapters::mock::{CatalogService, InterestQueue, MemberDirectory, Notifier};
use rusty_game_rental::application::rental::ServiceDependencies;
use rusty_game_rental::domain::item::Item;
use rusty_game_rental::domain::loan::Loan;
use rusty_game_rental::domain::value_objects::*;
use rusty_game_rental::ports::{item_repository, loan_repository, ItemRepository, LoanRepository};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// インメモリリポジトリ実装（テスト用）
// ============================================================================

/// インメモリItemRepository実装
///
/// updateは保存済みversionとの照合で楽観的チェックを再現する。
pub struct InMemoryItemRepository {
    items: Mutex<HashMap<ItemId, Item>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
        }
    }

    /// テスト用：現在の保存状態を覗く
    pub fn stored(&self, item_id: ItemId) -> Option<Item> {
        self.items.lock().unwrap().get(&item_id).cloned()
    }
}

#[async_trait::async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn insert(&self, item: Item) -> item_repository::Result<()> {
        self.items.lock().unwrap().insert(item.item_id, item);
        Ok(())
    }

    async fn get(&self, item_id: ItemId) -> item_repository::Result<Option<Item>> {
        Ok(self.items.lock().unwrap().get(&item_id).cloned())
    }

    async fn update(&self, item: &Item, expected_version: i64) -> item_repository::Result<bool> {
        let mut items = self.items.lock().unwrap();
        match items.get(&item.item_id) {
            Some(current) if current.version == expected_version => {
                items.insert(item.item_id, item.clone());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_if_available(&self, item_id: ItemId) -> item_repository::Result<bool> {
        let mut items = self.items.lock().unwrap();
        match items.get(&item_id) {
            Some(item) if item.availability.is_available() => {
                items.remove(&item_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_available_by_catalog_entry(
        &self,
        catalog_entry_id: CatalogEntryId,
    ) -> item_repository::Result<Vec<Item>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|i| i.catalog_entry_id == catalog_entry_id && i.availability.is_available())
            .cloned()
            .collect())
    }
}

/// インメモリLoanRepository実装
pub struct InMemoryLoanRepository {
    loans: Mutex<HashMap<LoanId, Loan>>,
}

impl InMemoryLoanRepository {
    pub fn new() -> Self {
        Self {
            loans: Mutex::new(HashMap::new()),
        }
    }

    /// テスト用：保存済み貸出の総数
    pub fn count(&self) -> usize {
        self.loans.lock().unwrap().len()
    }

    /// テスト用：物品を参照する未終了貸出の数
    pub fn open_count_for_item(&self, item_id: ItemId) -> usize {
        self.loans
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.item_id() == item_id && l.is_open())
            .count()
    }
}

#[async_trait::async_trait]
impl LoanRepository for InMemoryLoanRepository {
    async fn insert(&self, loan: Loan) -> loan_repository::Result<()> {
        self.loans.lock().unwrap().insert(loan.loan_id(), loan);
        Ok(())
    }

    async fn get(&self, loan_id: LoanId) -> loan_repository::Result<Option<Loan>> {
        Ok(self.loans.lock().unwrap().get(&loan_id).cloned())
    }

    async fn update(&self, loan: &Loan) -> loan_repository::Result<()> {
        self.loans.lock().unwrap().insert(loan.loan_id(), loan.clone());
        Ok(())
    }

    async fn find_open_for_item(&self, item_id: ItemId) -> loan_repository::Result<Option<Loan>> {
        Ok(self
            .loans
            .lock()
            .unwrap()
            .values()
            .find(|l| l.item_id() == item_id && l.is_open())
            .cloned())
    }
}

// ============================================================================
// テストコンテキスト
// ============================================================================

/// すべてのポートをインメモリ実装で束ねたテスト用の依存関係
pub struct TestContext {
    pub deps: ServiceDependencies,
    pub items: Arc<InMemoryItemRepository>,
    pub loans: Arc<InMemoryLoanRepository>,
    pub queue: Arc<InterestQueue>,
    pub members: Arc<MemberDirectory>,
    pub catalog: Arc<CatalogService>,
    pub notifier: Arc<Notifier>,
}

pub fn build_context() -> TestContext {
    let items = Arc::new(InMemoryItemRepository::new());
    let loans = Arc::new(InMemoryLoanRepository::new());
    let queue = Arc::new(InterestQueue::new());
    let members = Arc::new(MemberDirectory::new());
    let catalog = Arc::new(CatalogService::new());
    let notifier = Arc::new(Notifier::new());

    let deps = ServiceDependencies {
        item_repository: items.clone(),
        loan_repository: loans.clone(),
        interest_queue: queue.clone(),
        member_directory: members.clone(),
        catalog_service: catalog.clone(),
        notifier: notifier.clone(),
    };

    TestContext {
        deps,
        items,
        loans,
        queue,
        members,
        catalog,
        notifier,
    }
}

/// spawnされたdispatchの完了を待つヘルパー
///
/// 条件が満たされるまで最大2秒ポーリングする。
/// 満たされない場合はそのままfalseを返し、呼び出し側のassertで落とす。
pub async fn wait_until<F: Fn() -> bool>(condition: F) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
