use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ItemAvailable;
use crate::domain::commands::RequestLoan;
use crate::domain::loan::Loan;
use crate::domain::value_objects::{ItemId, MemberId};

/// 貸出申込リクエスト（POST /loans）
#[derive(Debug, Deserialize)]
pub struct RequestLoanRequest {
    pub item_id: Uuid,
    pub borrower_id: Uuid,
    pub starts_on: DateTime<Utc>,
    pub ends_on: DateTime<Utc>,
}

impl RequestLoanRequest {
    pub fn to_command(&self) -> RequestLoan {
        RequestLoan {
            item_id: ItemId::from_uuid(self.item_id),
            borrower_id: MemberId::from_uuid(self.borrower_id),
            starts_on: self.starts_on,
            ends_on: self.ends_on,
            requested_at: Utc::now(),
        }
    }
}

/// 貸出作成レスポンス（POST /loans）
#[derive(Debug, Serialize)]
pub struct LoanCreatedResponse {
    pub loan_id: Uuid,
    pub item_id: Uuid,
    pub borrower_id: Uuid,
    pub starts_on: DateTime<Utc>,
    pub ends_on: DateTime<Utc>,
    pub status: String,
}

/// 貸出レスポンス（GET /loans/:id、POST /loans/:id/activate）
#[derive(Debug, Serialize)]
pub struct LoanResponse {
    pub loan_id: Uuid,
    pub item_id: Uuid,
    pub borrower_id: Uuid,
    pub starts_on: DateTime<Utc>,
    pub ends_on: DateTime<Utc>,
    pub status: String,
    pub returned_at: Option<DateTime<Utc>>,
    pub declined_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        let (returned_at, declined_at) = match &loan {
            Loan::Returned(returned) => (Some(returned.returned_at), None),
            Loan::Declined(declined) => (None, Some(declined.declined_at)),
            _ => (None, None),
        };
        let core = loan.core();

        Self {
            loan_id: core.loan_id.value(),
            item_id: core.item_id.value(),
            borrower_id: core.borrower_id.value(),
            starts_on: core.window.starts_on(),
            ends_on: core.window.ends_on(),
            status: loan.status().as_str().to_string(),
            returned_at,
            declined_at,
            created_at: core.created_at,
            updated_at: core.updated_at,
        }
    }
}

/// 貸出終了レスポンス（POST /loans/:id/return、POST /loans/:id/decline）
///
/// 返却・却下が生成したItemAvailableイベントをそのまま可視化する。
/// 待機会員への通知はこのレスポンスとは独立に進行する。
#[derive(Debug, Serialize)]
pub struct LoanClosedResponse {
    pub loan_id: Uuid,
    pub item_id: Uuid,
    pub catalog_entry_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl LoanClosedResponse {
    pub fn new(loan_id: Uuid, event: ItemAvailable) -> Self {
        Self {
            loan_id,
            item_id: event.item_id.value(),
            catalog_entry_id: event.catalog_entry_id.value(),
            occurred_at: event.occurred_at,
        }
    }
}

/// 関心登録リクエスト（POST /catalog/:id/interest）
#[derive(Debug, Deserialize)]
pub struct RegisterInterestRequest {
    pub member_id: Uuid,
}

/// カタログ項目の貸出可否レスポンス（GET /catalog/:id/availability）
#[derive(Debug, Serialize)]
pub struct CatalogAvailabilityResponse {
    pub catalog_entry_id: Uuid,
    pub available: bool,
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
