use crate::application::rental::{
    RentalError, ServiceDependencies, activate_loan as execute_activate_loan,
    catalog_has_available_item, decline_loan as execute_decline_loan,
    register_interest as execute_register_interest, request_loan as execute_request_loan,
    return_loan as execute_return_loan, withdraw_interest as execute_withdraw_interest,
};
use crate::domain::commands::{
    ActivateLoan, DeclineLoan, RegisterInterest, ReturnLoan, WithdrawInterest,
};
use crate::domain::value_objects::{CatalogEntryId, LoanId, MemberId};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{
        CatalogAvailabilityResponse, LoanClosedResponse, LoanCreatedResponse, LoanResponse,
        RegisterInterestRequest, RequestLoanRequest,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /loans - 新しい貸出申込を作成
///
/// 強制されるビジネスルール:
/// - 物品が存在し貸出可能であること（並行申込の勝者は1人）
/// - 貸出期間が正当であること（終了 >= 開始、開始は過去でない）
pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RequestLoanRequest>,
) -> Result<(StatusCode, Json<LoanCreatedResponse>), ApiError> {
    let cmd = req.to_command();

    let loan_id = execute_request_loan(&state.service_deps, cmd.clone()).await?;

    let response = LoanCreatedResponse {
        loan_id: loan_id.value(),
        item_id: cmd.item_id.value(),
        borrower_id: cmd.borrower_id.value(),
        starts_on: cmd.starts_on,
        ends_on: cmd.ends_on,
        status: "requested".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /loans/:id/activate - 貸出を開始
///
/// 強制されるビジネスルール:
/// - 貸出が存在しRequested状態であること
pub async fn activate_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<Uuid>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    let loan_id = LoanId::from_uuid(loan_id);

    let cmd = ActivateLoan {
        loan_id,
        activated_at: chrono::Utc::now(),
    };

    execute_activate_loan(&state.service_deps, cmd).await?;

    // 更新された貸出を取得して新しい状態を返す
    let loan = state
        .service_deps
        .loan_repository
        .get(loan_id)
        .await
        .map_err(|e| ApiError::from(RentalError::LoanRepositoryError(e)))?
        .ok_or_else(|| ApiError::from(RentalError::LoanNotFound))?;

    Ok((StatusCode::OK, Json(LoanResponse::from(loan))))
}

/// POST /loans/:id/decline - 貸出申込を却下
///
/// 物品はAvailableに戻り、待機会員への通知がスケジュールされる。
/// レスポンスは通知の完了を待たない。
pub async fn decline_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<Uuid>,
) -> Result<(StatusCode, Json<LoanClosedResponse>), ApiError> {
    let loan_id = LoanId::from_uuid(loan_id);

    let cmd = DeclineLoan {
        loan_id,
        declined_at: chrono::Utc::now(),
    };

    let event = execute_decline_loan(&state.service_deps, cmd).await?;

    Ok((
        StatusCode::OK,
        Json(LoanClosedResponse::new(loan_id.value(), event)),
    ))
}

/// POST /loans/:id/return - 貸出品を返却
///
/// 強制されるビジネスルール:
/// - 貸出が存在しActive状態であること
///
/// 物品はAvailableに戻り、待機会員への通知がスケジュールされる。
/// レスポンスは通知の完了を待たない。
pub async fn return_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<Uuid>,
) -> Result<(StatusCode, Json<LoanClosedResponse>), ApiError> {
    let loan_id = LoanId::from_uuid(loan_id);

    let cmd = ReturnLoan {
        loan_id,
        returned_at: chrono::Utc::now(),
    };

    let event = execute_return_loan(&state.service_deps, cmd).await?;

    Ok((
        StatusCode::OK,
        Json(LoanClosedResponse::new(loan_id.value(), event)),
    ))
}

/// POST /catalog/:id/interest - カタログ項目への関心を登録
///
/// 冪等：同じ会員の再登録は204のまま何もしない。
/// 貸出可能な物品が存在しても登録は受け付ける。
pub async fn register_interest(
    State(state): State<Arc<AppState>>,
    Path(catalog_entry_id): Path<Uuid>,
    Json(req): Json<RegisterInterestRequest>,
) -> Result<StatusCode, ApiError> {
    let cmd = RegisterInterest {
        member_id: MemberId::from_uuid(req.member_id),
        catalog_entry_id: CatalogEntryId::from_uuid(catalog_entry_id),
    };

    execute_register_interest(&state.service_deps, cmd).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /catalog/:id/interest/:member_id - 関心を取り下げ
///
/// 未登録の会員の取り下げも204を返す。
pub async fn withdraw_interest(
    State(state): State<Arc<AppState>>,
    Path((catalog_entry_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let cmd = WithdrawInterest {
        member_id: MemberId::from_uuid(member_id),
        catalog_entry_id: CatalogEntryId::from_uuid(catalog_entry_id),
    };

    execute_withdraw_interest(&state.service_deps, cmd).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /loans/:id - 貸出詳細をIDで取得
pub async fn get_loan_by_id(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<Uuid>,
) -> Result<Json<LoanResponse>, QueryError> {
    let loan_id = LoanId::from_uuid(loan_id);

    match state.service_deps.loan_repository.get(loan_id).await {
        Ok(Some(loan)) => Ok(Json(LoanResponse::from(loan))),
        Ok(None) => Err(QueryError::NotFound(format!(
            "Loan {} not found",
            loan_id.value()
        ))),
        Err(e) => Err(QueryError::InternalError(e.to_string())),
    }
}

/// GET /catalog/:id/availability - カタログ項目の貸出可否
///
/// 貸出可能な物品の有無をクエリで導出して返す。
/// 関心登録の前の空き確認に使用される。
pub async fn get_catalog_availability(
    State(state): State<Arc<AppState>>,
    Path(catalog_entry_id): Path<Uuid>,
) -> Result<Json<CatalogAvailabilityResponse>, QueryError> {
    let catalog_entry_id = CatalogEntryId::from_uuid(catalog_entry_id);

    let available = catalog_has_available_item(&state.service_deps, catalog_entry_id)
        .await
        .map_err(|e| QueryError::InternalError(e.to_string()))?;

    Ok(Json(CatalogAvailabilityResponse {
        catalog_entry_id: catalog_entry_id.value(),
        available,
    }))
}

// ============================================================================
// Error types
// ============================================================================

/// クエリハンドラー用のエラー型
#[derive(Debug)]
pub enum QueryError {
    NotFound(String),
    InternalError(String),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            QueryError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            QueryError::InternalError(msg) => {
                // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                tracing::error!("Internal error in query handler: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(super::types::ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
