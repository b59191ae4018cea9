use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CatalogEntryId, ItemId, LoanId, MemberId};

/// イベント：貸出が申し込まれた
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRequested {
    pub loan_id: LoanId,
    pub item_id: ItemId,
    pub borrower_id: MemberId,
    pub starts_on: DateTime<Utc>,
    pub ends_on: DateTime<Utc>,
    pub requested_at: DateTime<Utc>,
}

/// イベント：貸出が開始された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanActivated {
    pub loan_id: LoanId,
    pub item_id: ItemId,
    pub activated_at: DateTime<Utc>,
}

/// イベント：貸出申込が却下された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanDeclined {
    pub loan_id: LoanId,
    pub item_id: ItemId,
    pub borrower_id: MemberId,
    pub declined_at: DateTime<Utc>,
}

/// イベント：貸出品が返却された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanReturned {
    pub loan_id: LoanId,
    pub item_id: ItemId,
    pub borrower_id: MemberId,
    pub returned_at: DateTime<Utc>,
}

/// イベント：物品が再び貸出可能になった
///
/// 返却・却下の状態遷移が生成する明示的なデータ。
/// Return Event Dispatcherがこのイベントを受け取り、
/// 該当カタログ項目の待機会員へ通知する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAvailable {
    pub item_id: ItemId,
    pub catalog_entry_id: CatalogEntryId,
    pub occurred_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ItemAvailableはdispatchのログにJSONで記録される
    #[test]
    fn test_item_available_serializes_reference_ids() {
        let event = ItemAvailable {
            item_id: ItemId::new(),
            catalog_entry_id: CatalogEntryId::new(),
            occurred_at: Utc::now(),
        };

        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["item_id"], serde_json::json!(event.item_id.value()));
        assert_eq!(
            json["catalog_entry_id"],
            serde_json::json!(event.catalog_entry_id.value())
        );
    }
}
