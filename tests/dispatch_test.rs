mod common;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rusty_game_rental::application::rental::{
    DispatchError, dispatch_item_available, register_interest,
};
use rusty_game_rental::domain::ItemAvailable;
use rusty_game_rental::domain::commands::RegisterInterest;
use rusty_game_rental::domain::value_objects::{CatalogEntryId, ItemId, MemberId};
use rusty_game_rental::ports::interest_queue::{self, InterestQueue};

use common::{TestContext, build_context};

fn item_available(catalog_entry_id: CatalogEntryId) -> ItemAvailable {
    ItemAvailable {
        item_id: ItemId::new(),
        catalog_entry_id,
        occurred_at: Utc::now(),
    }
}

/// 関心を登録済みの会員を1人用意する
async fn seed_waiting_member(ctx: &TestContext, catalog_entry_id: CatalogEntryId) -> MemberId {
    let member_id = MemberId::new();
    ctx.members
        .add_member(member_id, "Waiting Member", "waiting@example.com");
    register_interest(
        &ctx.deps,
        RegisterInterest {
            member_id,
            catalog_entry_id,
        },
    )
    .await
    .unwrap();
    member_id
}

// ============================================================================
// 基本動作
// ============================================================================

#[tokio::test]
async fn test_dispatch_notifies_each_drained_member_once() {
    let ctx = build_context();
    let catalog_entry_id = CatalogEntryId::new();
    ctx.catalog.add_entry(catalog_entry_id, "Wingspan");
    let first = seed_waiting_member(&ctx, catalog_entry_id).await;
    let second = seed_waiting_member(&ctx, catalog_entry_id).await;

    let report = dispatch_item_available(&ctx.deps, item_available(catalog_entry_id))
        .await
        .unwrap();

    assert_eq!(report.drained, 2);
    assert_eq!(report.notified.len(), 2);
    assert!(report.skipped.is_empty());
    assert!(report.failed.is_empty());
    assert_eq!(ctx.notifier.sent_count_for(first), 1);
    assert_eq!(ctx.notifier.sent_count_for(second), 1);
}

#[tokio::test]
async fn test_empty_drain_is_a_noop() {
    let ctx = build_context();
    let catalog_entry_id = CatalogEntryId::new();

    let report = dispatch_item_available(&ctx.deps, item_available(catalog_entry_id))
        .await
        .unwrap();

    // 関心ゼロなら会員解決も通知も一切行わない
    assert_eq!(report.drained, 0);
    assert!(report.notified.is_empty());
    assert!(ctx.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_second_dispatch_after_drain_notifies_nobody() {
    let ctx = build_context();
    let catalog_entry_id = CatalogEntryId::new();
    let member_id = seed_waiting_member(&ctx, catalog_entry_id).await;

    let first = dispatch_item_available(&ctx.deps, item_available(catalog_entry_id))
        .await
        .unwrap();
    assert_eq!(first.notified, vec![member_id]);

    // drainが関心を消しているので、2回目のdispatchは何もしない
    let second = dispatch_item_available(&ctx.deps, item_available(catalog_entry_id))
        .await
        .unwrap();
    assert_eq!(second.drained, 0);
    assert_eq!(ctx.notifier.sent_count_for(member_id), 1);
}

#[tokio::test]
async fn test_interest_registered_after_drain_survives_for_next_dispatch() {
    let ctx = build_context();
    let catalog_entry_id = CatalogEntryId::new();
    let early = seed_waiting_member(&ctx, catalog_entry_id).await;

    dispatch_item_available(&ctx.deps, item_available(catalog_entry_id))
        .await
        .unwrap();

    // drain後に登録された関心は失われず、次のdispatchで通知される
    let late = seed_waiting_member(&ctx, catalog_entry_id).await;
    let report = dispatch_item_available(&ctx.deps, item_available(catalog_entry_id))
        .await
        .unwrap();

    assert_eq!(report.notified, vec![late]);
    assert_eq!(ctx.notifier.sent_count_for(early), 1);
    assert_eq!(ctx.notifier.sent_count_for(late), 1);
}

// ============================================================================
// 会員単位の失敗の隔離
// ============================================================================

#[tokio::test]
async fn test_notifier_failure_does_not_block_other_members() {
    let ctx = build_context();
    let catalog_entry_id = CatalogEntryId::new();
    let failing = seed_waiting_member(&ctx, catalog_entry_id).await;
    let healthy = seed_waiting_member(&ctx, catalog_entry_id).await;
    ctx.notifier.fail_for(failing);

    let report = dispatch_item_available(&ctx.deps, item_available(catalog_entry_id))
        .await
        .unwrap();

    assert_eq!(report.drained, 2);
    assert_eq!(report.notified, vec![healthy]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, failing);
    assert_eq!(ctx.notifier.sent_count_for(healthy), 1);
    assert_eq!(ctx.notifier.sent_count_for(failing), 0);
}

#[tokio::test]
async fn test_unresolvable_member_is_skipped() {
    let ctx = build_context();
    let catalog_entry_id = CatalogEntryId::new();
    let resolvable = seed_waiting_member(&ctx, catalog_entry_id).await;

    // ディレクトリに存在しない会員（退会済みなど）
    let ghost = MemberId::new();
    register_interest(
        &ctx.deps,
        RegisterInterest {
            member_id: ghost,
            catalog_entry_id,
        },
    )
    .await
    .unwrap();

    let report = dispatch_item_available(&ctx.deps, item_available(catalog_entry_id))
        .await
        .unwrap();

    assert_eq!(report.drained, 2);
    assert_eq!(report.notified, vec![resolvable]);
    assert_eq!(report.skipped, vec![ghost]);
    assert_eq!(ctx.notifier.sent_count_for(ghost), 0);
}

// ============================================================================
// ストア障害
// ============================================================================

/// drainが常に失敗する関心キュー
struct FailingInterestQueue;

#[async_trait::async_trait]
impl InterestQueue for FailingInterestQueue {
    async fn add_member(
        &self,
        _catalog_entry_id: CatalogEntryId,
        _member_id: MemberId,
    ) -> interest_queue::Result<()> {
        Err("interest store is down".into())
    }

    async fn remove_member(
        &self,
        _catalog_entry_id: CatalogEntryId,
        _member_id: MemberId,
    ) -> interest_queue::Result<()> {
        Err("interest store is down".into())
    }

    async fn key_exists(&self, _catalog_entry_id: CatalogEntryId) -> interest_queue::Result<bool> {
        Err("interest store is down".into())
    }

    async fn drain(
        &self,
        _catalog_entry_id: CatalogEntryId,
    ) -> interest_queue::Result<HashSet<MemberId>> {
        Err("interest store is down".into())
    }
}

#[tokio::test]
async fn test_dispatch_fails_whole_when_drain_fails() {
    let mut ctx = build_context();
    ctx.deps.interest_queue = Arc::new(FailingInterestQueue);

    let result = dispatch_item_available(&ctx.deps, item_available(CatalogEntryId::new())).await;

    // drainは全か無か：失敗時は通知も1件も行われない
    assert!(matches!(result, Err(DispatchError::StoreUnavailable(_))));
    assert!(ctx.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_register_interest_surfaces_store_failure() {
    let mut ctx = build_context();
    ctx.deps.interest_queue = Arc::new(FailingInterestQueue);

    let result = register_interest(
        &ctx.deps,
        RegisterInterest {
            member_id: MemberId::new(),
            catalog_entry_id: CatalogEntryId::new(),
        },
    )
    .await;

    assert!(matches!(
        result,
        Err(rusty_game_rental::application::rental::RentalError::StoreUnavailable(_))
    ));
}
