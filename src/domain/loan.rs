#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    ActivateLoanError, DeclineLoanError, ItemId, LoanActivated, LoanDeclined, LoanId,
    LoanRequested, LoanReturned, LoanWindow, MemberId, RequestLoanError, ReturnLoanError,
};

// ============================================================================
// 型安全な状態パターン
// ============================================================================

/// Loan集約の共通フィールド
///
/// すべての貸出状態（Requested, Active, Returned, Declined）で
/// 共有されるコアデータ。
///
/// 他の集約へはIDのみで参照する（Item側はLoanへの逆参照を持たない）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanCore {
    // 識別子
    pub loan_id: LoanId,

    // 他の集約への参照（IDのみ）
    pub item_id: ItemId,
    pub borrower_id: MemberId,

    // 貸出期間
    pub window: LoanWindow,

    // 監査情報
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 申込中状態
///
/// ビジネスルール：
/// - 物品は申込時点でHeldになる
/// - 開始（Active）または却下（Declined）へ遷移できる
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedLoan {
    #[serde(flatten)]
    pub core: LoanCore,
}

impl std::ops::Deref for RequestedLoan {
    type Target = LoanCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

/// 貸出中状態
///
/// ビジネスルール：
/// - 返却（Returned）へのみ遷移できる
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveLoan {
    #[serde(flatten)]
    pub core: LoanCore,
}

impl std::ops::Deref for ActiveLoan {
    type Target = LoanCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

/// 返却済み状態（終端）
///
/// ビジネスルール：
/// - returned_atが必須（型で保証）
/// - 操作不可（読み取り専用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnedLoan {
    #[serde(flatten)]
    pub core: LoanCore,
    pub returned_at: DateTime<Utc>,
}

impl std::ops::Deref for ReturnedLoan {
    type Target = LoanCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

/// 却下済み状態（終端）
///
/// ビジネスルール：
/// - declined_atが必須（型で保証）
/// - 操作不可（読み取り専用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclinedLoan {
    #[serde(flatten)]
    pub core: LoanCore,
    pub declined_at: DateTime<Utc>,
}

impl std::ops::Deref for DeclinedLoan {
    type Target = LoanCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

/// Loan集約の統合型
///
/// 型安全な状態パターン：
/// - 不正な状態を型システムで排除
/// - 状態遷移を明示的に表現
///
/// 遷移は単調：Requested → Active → Returned、
/// または Requested → Declined。終端状態からの遷移は常に失敗する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Loan {
    Requested(RequestedLoan),
    Active(ActiveLoan),
    Returned(ReturnedLoan),
    Declined(DeclinedLoan),
}

impl Loan {
    pub fn loan_id(&self) -> LoanId {
        self.core().loan_id
    }

    pub fn item_id(&self) -> ItemId {
        self.core().item_id
    }

    pub fn borrower_id(&self) -> MemberId {
        self.core().borrower_id
    }

    pub fn core(&self) -> &LoanCore {
        match self {
            Loan::Requested(l) => &l.core,
            Loan::Active(l) => &l.core,
            Loan::Returned(l) => &l.core,
            Loan::Declined(l) => &l.core,
        }
    }

    pub fn status(&self) -> LoanStatus {
        match self {
            Loan::Requested(_) => LoanStatus::Requested,
            Loan::Active(_) => LoanStatus::Active,
            Loan::Returned(_) => LoanStatus::Returned,
            Loan::Declined(_) => LoanStatus::Declined,
        }
    }

    /// 終端状態（Returned / Declined）か
    pub fn is_terminal(&self) -> bool {
        matches!(self, Loan::Returned(_) | Loan::Declined(_))
    }

    /// 未終了（物品を保持している）か
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }
}

/// 貸出ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Requested,
    Active,
    Returned,
    Declined,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Requested => "requested",
            LoanStatus::Active => "active",
            LoanStatus::Returned => "returned",
            LoanStatus::Declined => "declined",
        }
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "requested" => Ok(LoanStatus::Requested),
            "active" => Ok(LoanStatus::Active),
            "returned" => Ok(LoanStatus::Returned),
            "declined" => Ok(LoanStatus::Declined),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

// ============================================================================
// 純粋関数による状態遷移
// ============================================================================

/// 純粋関数：貸出を申し込む
///
/// ビジネスルール：
/// - 貸出期間は検証済みでなければならない（終了 >= 開始、開始は過去でない）
/// - 初期状態はRequested
///
/// 物品のAvailable確認と保持はアプリケーション層の責務
/// （リポジトリの楽観的同時実行制御と組で初めて原子的になるため）。
///
/// 副作用なし。新しいRequestedLoanとイベントを返す。
pub fn request_loan(
    item_id: ItemId,
    borrower_id: MemberId,
    starts_on: DateTime<Utc>,
    ends_on: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(RequestedLoan, LoanRequested), RequestLoanError> {
    let window = LoanWindow::new(starts_on, ends_on, now)?;
    let loan_id = LoanId::new();

    let loan = RequestedLoan {
        core: LoanCore {
            loan_id,
            item_id,
            borrower_id,
            window,
            created_at: now,
            updated_at: now,
        },
    };

    let event = LoanRequested {
        loan_id,
        item_id,
        borrower_id,
        starts_on: window.starts_on(),
        ends_on: window.ends_on(),
        requested_at: now,
    };

    Ok((loan, event))
}

/// 純粋関数：貸出を開始する
///
/// ビジネスルール：
/// - Requested状態のみ開始できる
/// - 物品への副作用なし（申込時点で既にHeld）
///
/// 副作用なし。新しいActiveLoanとイベントを返す。
pub fn activate_loan(
    loan: Loan,
    now: DateTime<Utc>,
) -> Result<(ActiveLoan, LoanActivated), ActivateLoanError> {
    let requested = match loan {
        Loan::Requested(requested) => requested,
        Loan::Active(_) => return Err(ActivateLoanError::AlreadyActive),
        Loan::Returned(_) => return Err(ActivateLoanError::AlreadyReturned),
        Loan::Declined(_) => return Err(ActivateLoanError::AlreadyDeclined),
    };

    let loan_id = requested.loan_id;
    let item_id = requested.item_id;

    let active = ActiveLoan {
        core: LoanCore {
            updated_at: now,
            ..requested.core
        },
    };

    let event = LoanActivated {
        loan_id,
        item_id,
        activated_at: now,
    };

    Ok((active, event))
}

/// 純粋関数：貸出申込を却下する
///
/// ビジネスルール：
/// - Requested状態のみ却下できる
/// - 物品はAvailableに戻る（解放はアプリケーション層が行い、
///   返却と同じくItemAvailableイベントが発火する）
///
/// 副作用なし。新しいDeclinedLoanとイベントを返す。
pub fn decline_loan(
    loan: Loan,
    now: DateTime<Utc>,
) -> Result<(DeclinedLoan, LoanDeclined), DeclineLoanError> {
    let requested = match loan {
        Loan::Requested(requested) => requested,
        Loan::Active(_) => return Err(DeclineLoanError::AlreadyActive),
        Loan::Returned(_) => return Err(DeclineLoanError::AlreadyReturned),
        Loan::Declined(_) => return Err(DeclineLoanError::AlreadyDeclined),
    };

    let loan_id = requested.loan_id;
    let item_id = requested.item_id;
    let borrower_id = requested.borrower_id;

    let declined = DeclinedLoan {
        core: LoanCore {
            updated_at: now,
            ..requested.core
        },
        declined_at: now,
    };

    let event = LoanDeclined {
        loan_id,
        item_id,
        borrower_id,
        declined_at: now,
    };

    Ok((declined, event))
}

/// 純粋関数：貸出品を返却する
///
/// ビジネスルール：
/// - Active状態のみ返却できる
/// - 物品はAvailableに戻り、ItemAvailableイベントが発火する
///
/// 副作用なし。新しいReturnedLoanとイベントを返す。
pub fn return_loan(
    loan: Loan,
    now: DateTime<Utc>,
) -> Result<(ReturnedLoan, LoanReturned), ReturnLoanError> {
    let active = match loan {
        Loan::Active(active) => active,
        Loan::Requested(_) => return Err(ReturnLoanError::NotYetActive),
        Loan::Returned(_) => return Err(ReturnLoanError::AlreadyReturned),
        Loan::Declined(_) => return Err(ReturnLoanError::AlreadyDeclined),
    };

    let loan_id = active.loan_id;
    let item_id = active.item_id;
    let borrower_id = active.borrower_id;

    let returned = ReturnedLoan {
        core: LoanCore {
            updated_at: now,
            ..active.core
        },
        returned_at: now,
    };

    let event = LoanReturned {
        loan_id,
        item_id,
        borrower_id,
        returned_at: now,
    };

    Ok((returned, event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LoanWindowError;
    use chrono::Duration;

    fn requested(now: DateTime<Utc>) -> (RequestedLoan, LoanRequested) {
        request_loan(
            ItemId::new(),
            MemberId::new(),
            now,
            now + Duration::days(7),
            now,
        )
        .unwrap()
    }

    // TDD: request_loan() のテスト
    #[test]
    fn test_request_loan_creates_requested_loan() {
        let item_id = ItemId::new();
        let borrower_id = MemberId::new();
        let now = Utc::now();

        let (loan, event) =
            request_loan(item_id, borrower_id, now, now + Duration::days(7), now).unwrap();

        assert_eq!(loan.item_id, item_id);
        assert_eq!(loan.borrower_id, borrower_id);
        assert_eq!(loan.window.starts_on(), now);
        assert_eq!(loan.window.ends_on(), now + Duration::days(7));
        assert_eq!(loan.created_at, now);

        // イベントの検証
        assert_eq!(event.loan_id, loan.loan_id);
        assert_eq!(event.item_id, item_id);
        assert_eq!(event.borrower_id, borrower_id);
        assert_eq!(event.requested_at, now);
    }

    #[test]
    fn test_request_loan_rejects_end_before_start() {
        let now = Utc::now();
        let result = request_loan(
            ItemId::new(),
            MemberId::new(),
            now + Duration::days(2),
            now + Duration::days(1),
            now,
        );
        assert_eq!(
            result.unwrap_err(),
            RequestLoanError::InvalidWindow(LoanWindowError::EndsBeforeStart)
        );
    }

    #[test]
    fn test_request_loan_rejects_start_in_past() {
        let now = Utc::now();
        let result = request_loan(
            ItemId::new(),
            MemberId::new(),
            now - Duration::hours(1),
            now + Duration::days(1),
            now,
        );
        assert_eq!(
            result.unwrap_err(),
            RequestLoanError::InvalidWindow(LoanWindowError::StartsInPast)
        );
    }

    // TDD: activate_loan() のテスト
    #[test]
    fn test_activate_loan_success() {
        let now = Utc::now();
        let (loan, _) = requested(now);
        let activated_at = now + Duration::hours(2);

        let (active, event) = activate_loan(Loan::Requested(loan.clone()), activated_at).unwrap();

        assert_eq!(active.loan_id, loan.loan_id);
        assert_eq!(active.updated_at, activated_at);
        assert_eq!(event.loan_id, loan.loan_id);
        assert_eq!(event.item_id, loan.item_id);
        assert_eq!(event.activated_at, activated_at);
    }

    #[test]
    fn test_activate_loan_fails_when_already_active() {
        let now = Utc::now();
        let (loan, _) = requested(now);
        let (active, _) = activate_loan(Loan::Requested(loan), now).unwrap();

        let result = activate_loan(Loan::Active(active), now + Duration::hours(1));
        assert_eq!(result.unwrap_err(), ActivateLoanError::AlreadyActive);
    }

    #[test]
    fn test_activate_loan_fails_from_terminal_states() {
        let now = Utc::now();

        let (loan, _) = requested(now);
        let (declined, _) = decline_loan(Loan::Requested(loan), now).unwrap();
        let result = activate_loan(Loan::Declined(declined), now);
        assert_eq!(result.unwrap_err(), ActivateLoanError::AlreadyDeclined);

        let (loan, _) = requested(now);
        let (active, _) = activate_loan(Loan::Requested(loan), now).unwrap();
        let (returned, _) = return_loan(Loan::Active(active), now).unwrap();
        let result = activate_loan(Loan::Returned(returned), now);
        assert_eq!(result.unwrap_err(), ActivateLoanError::AlreadyReturned);
    }

    // TDD: decline_loan() のテスト
    #[test]
    fn test_decline_loan_success() {
        let now = Utc::now();
        let (loan, _) = requested(now);
        let declined_at = now + Duration::hours(3);

        let (declined, event) = decline_loan(Loan::Requested(loan.clone()), declined_at).unwrap();

        assert_eq!(declined.declined_at, declined_at);
        assert_eq!(event.loan_id, loan.loan_id);
        assert_eq!(event.item_id, loan.item_id);
        assert_eq!(event.borrower_id, loan.borrower_id);
    }

    #[test]
    fn test_decline_loan_fails_when_active() {
        let now = Utc::now();
        let (loan, _) = requested(now);
        let (active, _) = activate_loan(Loan::Requested(loan), now).unwrap();

        let result = decline_loan(Loan::Active(active), now);
        assert_eq!(result.unwrap_err(), DeclineLoanError::AlreadyActive);
    }

    #[test]
    fn test_decline_loan_fails_when_already_declined() {
        let now = Utc::now();
        let (loan, _) = requested(now);
        let (declined, _) = decline_loan(Loan::Requested(loan), now).unwrap();

        let result = decline_loan(Loan::Declined(declined), now + Duration::hours(1));
        assert_eq!(result.unwrap_err(), DeclineLoanError::AlreadyDeclined);
    }

    // TDD: return_loan() のテスト
    #[test]
    fn test_return_loan_success() {
        let now = Utc::now();
        let (loan, _) = requested(now);
        let (active, _) = activate_loan(Loan::Requested(loan.clone()), now).unwrap();
        let returned_at = now + Duration::days(6);

        let (returned, event) = return_loan(Loan::Active(active), returned_at).unwrap();

        assert_eq!(returned.returned_at, returned_at);
        assert_eq!(returned.loan_id, loan.loan_id);
        assert_eq!(event.loan_id, loan.loan_id);
        assert_eq!(event.item_id, loan.item_id);
        assert_eq!(event.borrower_id, loan.borrower_id);
        assert_eq!(event.returned_at, returned_at);
    }

    #[test]
    fn test_return_loan_fails_when_not_yet_active() {
        let now = Utc::now();
        let (loan, _) = requested(now);

        let result = return_loan(Loan::Requested(loan), now);
        assert_eq!(result.unwrap_err(), ReturnLoanError::NotYetActive);
    }

    #[test]
    fn test_return_loan_fails_when_already_returned() {
        let now = Utc::now();
        let (loan, _) = requested(now);
        let (active, _) = activate_loan(Loan::Requested(loan), now).unwrap();
        let (returned, _) = return_loan(Loan::Active(active), now).unwrap();

        // 2回目の返却は失敗
        let result = return_loan(Loan::Returned(returned), now + Duration::hours(1));
        assert_eq!(result.unwrap_err(), ReturnLoanError::AlreadyReturned);
    }

    #[test]
    fn test_return_loan_fails_when_declined() {
        let now = Utc::now();
        let (loan, _) = requested(now);
        let (declined, _) = decline_loan(Loan::Requested(loan), now).unwrap();

        let result = return_loan(Loan::Declined(declined), now);
        assert_eq!(result.unwrap_err(), ReturnLoanError::AlreadyDeclined);
    }

    // ========================================================================
    // 統合型のテスト
    // ========================================================================

    #[test]
    fn test_loan_status_and_terminality() {
        let now = Utc::now();
        let (loan, _) = requested(now);
        let loan = Loan::Requested(loan);
        assert_eq!(loan.status(), LoanStatus::Requested);
        assert!(loan.is_open());

        let (active, _) = activate_loan(loan, now).unwrap();
        let loan = Loan::Active(active);
        assert_eq!(loan.status(), LoanStatus::Active);
        assert!(loan.is_open());

        let (returned, _) = return_loan(loan, now).unwrap();
        let loan = Loan::Returned(returned);
        assert_eq!(loan.status(), LoanStatus::Returned);
        assert!(loan.is_terminal());
    }

    #[test]
    fn test_loan_status_round_trip() {
        for status in [
            LoanStatus::Requested,
            LoanStatus::Active,
            LoanStatus::Returned,
            LoanStatus::Declined,
        ] {
            let parsed: LoanStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_deref_exposes_core_fields() {
        let now = Utc::now();
        let (loan, _) = requested(now);

        // Derefでcoreフィールドに直接アクセスできることを確認
        assert_eq!(loan.core.loan_id, loan.loan_id);
        assert_eq!(loan.core.item_id, loan.item_id);
    }
}
