use thiserror::Error;

use crate::domain::LoanWindowError;

/// 貸出管理アプリケーション層のエラー
///
/// 貸出ライフサイクルのエラーは同期的に呼び出し元へ返る。
/// dispatch内で発生する会員単位のエラー（会員不在・通知失敗）は
/// ここには現れず、DispatchReportに記録される。
#[derive(Debug, Error)]
pub enum RentalError {
    /// 物品が見つからない
    #[error("Item not found")]
    ItemNotFound,

    /// 貸出が見つからない
    #[error("Loan not found")]
    LoanNotFound,

    /// 物品が貸出可能でない（並行申込の敗者を含む）
    #[error("Item is not available for loan")]
    ItemUnavailable,

    /// 貸出期間が不正
    #[error("Invalid loan window: {0:?}")]
    InvalidWindow(LoanWindowError),

    /// 貸出の状態が不正（例: 終端状態からの遷移）
    #[error("Invalid loan state: {0}")]
    InvalidLoanState(String),

    /// 関心キューストアに到達できない
    ///
    /// register / withdraw では呼び出し元に返す
    /// （登録を黙って失うことは許されない）。
    #[error("Interest store unavailable")]
    StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// ItemRepositoryのエラー
    #[error("Item repository error")]
    ItemRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// LoanRepositoryのエラー
    #[error("Loan repository error")]
    LoanRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, RentalError>;
