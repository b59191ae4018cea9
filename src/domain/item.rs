#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CatalogEntryId, HoldItemError, ItemAvailable, ItemCondition, ItemId, MemberId,
    ReleaseItemError};

/// 物品の貸出可否
///
/// 保持者は貸出中（Held）のときのみ存在する。
/// Optionフィールドではなくenumで表現し、不正な組み合わせ
/// （Available + 保持者あり）を型システムで排除する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Availability {
    Available,
    Held { holder: MemberId },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }

    pub fn holder(&self) -> Option<MemberId> {
        match self {
            Availability::Available => None,
            Availability::Held { holder } => Some(*holder),
        }
    }
}

/// Item集約 - カタログ項目に属する1つの物理的な現物
///
/// 貸出可否の状態は貸出の状態遷移（request / decline / return）からのみ
/// 変更される。Loanへの逆参照は持たず、必要ならクエリで導出する。
///
/// `version`は楽観的同時実行制御のトークン。状態を変更する純粋関数は
/// 必ずインクリメントし、リポジトリは保存時に旧versionを照合する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: ItemId,
    pub catalog_entry_id: CatalogEntryId,
    pub condition: ItemCondition,
    pub availability: Availability,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// 新しい物品を作成する（初期状態はAvailable）
    pub fn new(
        catalog_entry_id: CatalogEntryId,
        condition: ItemCondition,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            item_id: ItemId::new(),
            catalog_entry_id,
            condition,
            availability: Availability::Available,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 純粋関数：物品を貸出中にする
///
/// ビジネスルール：
/// - Available状態の物品のみ保持できる
/// - 保持者は借りる会員
///
/// 副作用なし。新しいItemを返す。
pub fn hold_item(item: &Item, holder: MemberId, now: DateTime<Utc>) -> Result<Item, HoldItemError> {
    if !item.availability.is_available() {
        return Err(HoldItemError::AlreadyHeld);
    }

    Ok(Item {
        availability: Availability::Held { holder },
        version: item.version + 1,
        updated_at: now,
        ..item.clone()
    })
}

/// 純粋関数：物品を返却可能状態に戻す
///
/// ビジネスルール：
/// - Held状態の物品のみ解放できる
/// - 保持者はクリアされる
///
/// 副作用なし。新しいItemと、待機会員への通知の引き金となる
/// ItemAvailableイベントを返す。
pub fn release_item(
    item: &Item,
    now: DateTime<Utc>,
) -> Result<(Item, ItemAvailable), ReleaseItemError> {
    if item.availability.is_available() {
        return Err(ReleaseItemError::AlreadyAvailable);
    }

    let released = Item {
        availability: Availability::Available,
        version: item.version + 1,
        updated_at: now,
        ..item.clone()
    };

    let event = ItemAvailable {
        item_id: item.item_id,
        catalog_entry_id: item.catalog_entry_id,
        occurred_at: now,
    };

    Ok((released, event))
}
