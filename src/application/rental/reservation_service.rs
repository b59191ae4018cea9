use crate::domain::{commands::*, value_objects::*};

use super::errors::{RentalError, Result};
use super::loan_service::ServiceDependencies;

/// カタログ項目への関心を登録する（純粋な関数）
///
/// ビジネスルール：
/// - 冪等：既に登録済みの会員の再登録は何もしない
/// - 貸出可能な物品が存在しても登録は常に受け付ける
///   （事前の空き確認は呼び出し元のUXの責務）
///
/// 副作用は共有の関心キューストアへの書き込みのみ。
/// ストア障害は呼び出し元へ返す（登録を黙って失うことは許されない）。
#[allow(dead_code)]
pub async fn register_interest(deps: &ServiceDependencies, cmd: RegisterInterest) -> Result<()> {
    deps.interest_queue
        .add_member(cmd.catalog_entry_id, cmd.member_id)
        .await
        .map_err(RentalError::StoreUnavailable)?;

    tracing::debug!(
        member_id = %cmd.member_id.value(),
        catalog_entry_id = %cmd.catalog_entry_id.value(),
        "interest registered"
    );

    Ok(())
}

/// カタログ項目への関心を取り下げる（純粋な関数）
///
/// 未登録の会員の取り下げはエラーにしない。
#[allow(dead_code)]
pub async fn withdraw_interest(deps: &ServiceDependencies, cmd: WithdrawInterest) -> Result<()> {
    deps.interest_queue
        .remove_member(cmd.catalog_entry_id, cmd.member_id)
        .await
        .map_err(RentalError::StoreUnavailable)?;

    tracing::debug!(
        member_id = %cmd.member_id.value(),
        catalog_entry_id = %cmd.catalog_entry_id.value(),
        "interest withdrawn"
    );

    Ok(())
}

/// カタログ項目に貸出可能な物品があるか（純粋な関数）
///
/// カタログ単位の貸出可否は物品のクエリで導出する。
/// 共有の可変カウンタは持たない（同期が不要になる）。
#[allow(dead_code)]
pub async fn catalog_has_available_item(
    deps: &ServiceDependencies,
    catalog_entry_id: CatalogEntryId,
) -> Result<bool> {
    let available = deps
        .item_repository
        .find_available_by_catalog_entry(catalog_entry_id)
        .await
        .map_err(RentalError::ItemRepositoryError)?;

    Ok(!available.is_empty())
}
