#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 物品ID - 貸出コンテキストの集約ID（1つの物理的な現物）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// カタログ項目ID - カタログ管理コンテキストへの参照（ゲームの抽象的な品目）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntryId(Uuid);

impl CatalogEntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for CatalogEntryId {
    fn default() -> Self {
        Self::new()
    }
}

/// 貸出ID - 貸出記録の集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(Uuid);

impl LoanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

/// 会員ID - 会員管理コンテキストへの参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

/// 物品の保存状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCondition {
    New,
    Good,
    Damaged,
    NeedsRepair,
    ToReplace,
}

impl ItemCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCondition::New => "new",
            ItemCondition::Good => "good",
            ItemCondition::Damaged => "damaged",
            ItemCondition::NeedsRepair => "needs_repair",
            ItemCondition::ToReplace => "to_replace",
        }
    }
}

impl std::str::FromStr for ItemCondition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "new" => Ok(ItemCondition::New),
            "good" => Ok(ItemCondition::Good),
            "damaged" => Ok(ItemCondition::Damaged),
            "needs_repair" => Ok(ItemCondition::NeedsRepair),
            "to_replace" => Ok(ItemCondition::ToReplace),
            _ => Err(format!("Invalid item condition: {}", s)),
        }
    }
}

/// 貸出期間エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanWindowError {
    /// 終了日が開始日より前
    EndsBeforeStart,
    /// 開始日が過去
    StartsInPast,
}

/// 貸出期間
///
/// 不変条件：
/// - 終了日 >= 開始日
/// - 作成時点で開始日は過去でない
///
/// 型システムでこの制約を強制し、不正な期間を作成できないようにする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanWindow {
    starts_on: DateTime<Utc>,
    ends_on: DateTime<Utc>,
}

impl LoanWindow {
    /// 期間を検証して作成する
    ///
    /// # エラー
    /// - `EndsBeforeStart`: 終了日が開始日より前
    /// - `StartsInPast`: 開始日が`now`より前
    pub fn new(
        starts_on: DateTime<Utc>,
        ends_on: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Self, LoanWindowError> {
        if ends_on < starts_on {
            return Err(LoanWindowError::EndsBeforeStart);
        }
        if starts_on < now {
            return Err(LoanWindowError::StartsInPast);
        }
        Ok(Self { starts_on, ends_on })
    }

    /// 永続化済みの値から復元する（検証なし）
    ///
    /// リポジトリ層専用。作成時の検証を再適用すると、
    /// 過去に開始した正当な貸出が復元できなくなる。
    pub fn from_persisted(starts_on: DateTime<Utc>, ends_on: DateTime<Utc>) -> Self {
        Self { starts_on, ends_on }
    }

    pub fn starts_on(&self) -> DateTime<Utc> {
        self.starts_on
    }

    pub fn ends_on(&self) -> DateTime<Utc> {
        self.ends_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    // ID value objects のテスト
    #[test]
    fn test_item_id_creation() {
        let id1 = ItemId::new();
        let id2 = ItemId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_item_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = ItemId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
    }

    #[test]
    fn test_catalog_entry_id_creation() {
        let id1 = CatalogEntryId::new();
        let id2 = CatalogEntryId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_loan_id_creation() {
        let id1 = LoanId::new();
        let id2 = LoanId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_member_id_creation() {
        let id1 = MemberId::new();
        let id2 = MemberId::new();
        assert_ne!(id1, id2);
    }

    // TDD: ItemCondition のテスト
    #[test]
    fn test_item_condition_round_trip() {
        for condition in [
            ItemCondition::New,
            ItemCondition::Good,
            ItemCondition::Damaged,
            ItemCondition::NeedsRepair,
            ItemCondition::ToReplace,
        ] {
            let parsed: ItemCondition = condition.as_str().parse().unwrap();
            assert_eq!(parsed, condition);
        }
    }

    #[test]
    fn test_item_condition_rejects_unknown() {
        let result = "pristine".parse::<ItemCondition>();
        assert!(result.is_err());
    }

    // TDD: LoanWindow のテスト
    #[test]
    fn test_loan_window_valid() {
        let now = Utc::now();
        let window = LoanWindow::new(now, now + Duration::days(7), now);
        assert!(window.is_ok());

        let window = window.unwrap();
        assert_eq!(window.starts_on(), now);
        assert_eq!(window.ends_on(), now + Duration::days(7));
    }

    #[test]
    fn test_loan_window_same_day_is_valid() {
        let now = Utc::now();
        let window = LoanWindow::new(now, now, now);
        assert!(window.is_ok());
    }

    #[test]
    fn test_loan_window_rejects_end_before_start() {
        let now = Utc::now();
        let result = LoanWindow::new(now + Duration::days(2), now + Duration::days(1), now);
        assert_eq!(result.unwrap_err(), LoanWindowError::EndsBeforeStart);
    }

    #[test]
    fn test_loan_window_rejects_start_in_past() {
        let now = Utc::now();
        let result = LoanWindow::new(now - Duration::days(1), now + Duration::days(7), now);
        assert_eq!(result.unwrap_err(), LoanWindowError::StartsInPast);
    }

    #[test]
    fn test_loan_window_from_persisted_skips_validation() {
        let now = Utc::now();
        let window = LoanWindow::from_persisted(now - Duration::days(3), now + Duration::days(4));
        assert_eq!(window.starts_on(), now - Duration::days(3));
    }
}
