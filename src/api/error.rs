use crate::application::rental::RentalError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError(RentalError);

impl From<RentalError> for ApiError {
    fn from(err: RentalError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self.0 {
            // 404 Not Found - リクエストされたリソースが存在しない
            RentalError::ItemNotFound => (StatusCode::NOT_FOUND, "ITEM_NOT_FOUND", "Item not found"),
            RentalError::LoanNotFound => (StatusCode::NOT_FOUND, "LOAN_NOT_FOUND", "Loan not found"),

            // 409 Conflict - 並行申込の敗者を含む
            RentalError::ItemUnavailable => (
                StatusCode::CONFLICT,
                "ITEM_UNAVAILABLE",
                "Item is not available for loan",
            ),

            // 422 Unprocessable Entity - ビジネスルール違反
            RentalError::InvalidWindow(ref e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_WINDOW",
                match e {
                    crate::domain::LoanWindowError::EndsBeforeStart => {
                        "Loan window ends before it starts"
                    }
                    crate::domain::LoanWindowError::StartsInPast => {
                        "Loan window starts in the past"
                    }
                },
            ),
            RentalError::InvalidLoanState(ref msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_LOAN_STATE",
                msg.as_str(),
            ),

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            RentalError::StoreUnavailable(ref e) => {
                tracing::error!("Interest store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_UNAVAILABLE",
                    "Interest store is unavailable",
                )
            }
            RentalError::ItemRepositoryError(ref e) => {
                tracing::error!("Item repository error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ITEM_REPOSITORY_ERROR",
                    "Item repository error",
                )
            }
            RentalError::LoanRepositoryError(ref e) => {
                tracing::error!("Loan repository error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LOAN_REPOSITORY_ERROR",
                    "Loan repository error",
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
