use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CatalogEntryId, ItemId, LoanId, MemberId};

/// コマンド：貸出を申し込む
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestLoan {
    pub item_id: ItemId,
    pub borrower_id: MemberId,
    pub starts_on: DateTime<Utc>,
    pub ends_on: DateTime<Utc>,
    pub requested_at: DateTime<Utc>,
}

/// コマンド：貸出を開始する
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivateLoan {
    pub loan_id: LoanId,
    pub activated_at: DateTime<Utc>,
}

/// コマンド：貸出申込を却下する
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclineLoan {
    pub loan_id: LoanId,
    pub declined_at: DateTime<Utc>,
}

/// コマンド：貸出品を返却する
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnLoan {
    pub loan_id: LoanId,
    pub returned_at: DateTime<Utc>,
}

/// コマンド：カタログ項目への関心を登録する
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterInterest {
    pub member_id: MemberId,
    pub catalog_entry_id: CatalogEntryId,
}

/// コマンド：カタログ項目への関心を取り下げる
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawInterest {
    pub member_id: MemberId,
    pub catalog_entry_id: CatalogEntryId,
}
