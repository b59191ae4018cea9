#![allow(dead_code)]

use super::LoanWindowError;

/// 物品保持のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldItemError {
    /// 既に貸出中
    AlreadyHeld,
}

/// 物品解放のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseItemError {
    /// 既に貸出可能状態
    AlreadyAvailable,
}

/// 貸出申込のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestLoanError {
    /// 貸出期間が不正
    InvalidWindow(LoanWindowError),
}

impl From<LoanWindowError> for RequestLoanError {
    fn from(err: LoanWindowError) -> Self {
        RequestLoanError::InvalidWindow(err)
    }
}

/// 貸出開始のエラー
///
/// Requested状態以外からの開始は不可。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivateLoanError {
    /// 既に貸出中
    AlreadyActive,
    /// 既に返却済み（終端状態）
    AlreadyReturned,
    /// 既に却下済み（終端状態）
    AlreadyDeclined,
}

/// 貸出却下のエラー
///
/// Requested状態以外からの却下は不可。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclineLoanError {
    /// 既に貸出中（却下できるのは申込中のみ）
    AlreadyActive,
    /// 既に返却済み（終端状態）
    AlreadyReturned,
    /// 既に却下済み（終端状態）
    AlreadyDeclined,
}

/// 返却のエラー
///
/// Active状態以外からの返却は不可。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnLoanError {
    /// まだ貸出開始していない
    NotYetActive,
    /// 既に返却済み（終端状態）
    AlreadyReturned,
    /// 既に却下済み（終端状態）
    AlreadyDeclined,
}
