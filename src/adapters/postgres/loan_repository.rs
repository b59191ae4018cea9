use crate::domain::loan::{
    ActiveLoan, DeclinedLoan, Loan, LoanCore, LoanStatus, RequestedLoan, ReturnedLoan,
};
use crate::domain::value_objects::{ItemId, LoanId, LoanWindow, MemberId};
use crate::ports::loan_repository::{LoanRepository as LoanRepositoryTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::str::FromStr;

fn invalid_data(msg: String) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, msg))
}

/// PostgreSQLの行データをLoan集約に変換する
///
/// status列から状態を判別し、終端状態の必須タイムスタンプ
/// （returned_at / declined_at）の欠落はエラーにする。
fn map_row_to_loan(row: &PgRow) -> Result<Loan> {
    let status_str: &str = row.get("status");
    let status = LoanStatus::from_str(status_str).map_err(invalid_data)?;

    let core = LoanCore {
        loan_id: LoanId::from_uuid(row.get("loan_id")),
        item_id: ItemId::from_uuid(row.get("item_id")),
        borrower_id: MemberId::from_uuid(row.get("borrower_id")),
        window: LoanWindow::from_persisted(row.get("starts_on"), row.get("ends_on")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    };

    let returned_at: Option<DateTime<Utc>> = row.get("returned_at");
    let declined_at: Option<DateTime<Utc>> = row.get("declined_at");

    match status {
        LoanStatus::Requested => Ok(Loan::Requested(RequestedLoan { core })),
        LoanStatus::Active => Ok(Loan::Active(ActiveLoan { core })),
        LoanStatus::Returned => {
            let returned_at = returned_at.ok_or_else(|| {
                invalid_data(format!(
                    "returned loan {} has no returned_at",
                    core.loan_id.value()
                ))
            })?;
            Ok(Loan::Returned(ReturnedLoan { core, returned_at }))
        }
        LoanStatus::Declined => {
            let declined_at = declined_at.ok_or_else(|| {
                invalid_data(format!(
                    "declined loan {} has no declined_at",
                    core.loan_id.value()
                ))
            })?;
            Ok(Loan::Declined(DeclinedLoan { core, declined_at }))
        }
    }
}

fn terminal_timestamps(loan: &Loan) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match loan {
        Loan::Returned(returned) => (Some(returned.returned_at), None),
        Loan::Declined(declined) => (None, Some(declined.declined_at)),
        _ => (None, None),
    }
}

/// LoanRepositoryのPostgreSQL実装
#[allow(dead_code)]
pub struct LoanRepository {
    pool: PgPool,
}

#[allow(dead_code)]
impl LoanRepository {
    /// PostgreSQLコネクションプールから新しいLoanRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn insert(&self, loan: Loan) -> Result<()> {
        let core = loan.core();
        let (returned_at, declined_at) = terminal_timestamps(&loan);

        sqlx::query(
            r#"
            INSERT INTO loans (
                loan_id,
                item_id,
                borrower_id,
                starts_on,
                ends_on,
                status,
                returned_at,
                declined_at,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(core.loan_id.value())
        .bind(core.item_id.value())
        .bind(core.borrower_id.value())
        .bind(core.window.starts_on())
        .bind(core.window.ends_on())
        .bind(loan.status().as_str())
        .bind(returned_at)
        .bind(declined_at)
        .bind(core.created_at)
        .bind(core.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT
                loan_id,
                item_id,
                borrower_id,
                starts_on,
                ends_on,
                status,
                returned_at,
                declined_at,
                created_at,
                updated_at
            FROM loans
            WHERE loan_id = $1
            "#,
        )
        .bind(loan_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    /// 貸出の現在状態を保存する
    ///
    /// ステータスは単調にのみ進むため、versionなしの単純UPDATE。
    async fn update(&self, loan: &Loan) -> Result<()> {
        let core = loan.core();
        let (returned_at, declined_at) = terminal_timestamps(loan);

        sqlx::query(
            r#"
            UPDATE loans
            SET
                status = $2,
                returned_at = $3,
                declined_at = $4,
                updated_at = $5
            WHERE loan_id = $1
            "#,
        )
        .bind(core.loan_id.value())
        .bind(loan.status().as_str())
        .bind(returned_at)
        .bind(declined_at)
        .bind(core.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 物品を参照している未終了（requested / active）の貸出を検索
    ///
    /// 不変条件により高々1件。
    async fn find_open_for_item(&self, item_id: ItemId) -> Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT
                loan_id,
                item_id,
                borrower_id,
                starts_on,
                ends_on,
                status,
                returned_at,
                declined_at,
                created_at,
                updated_at
            FROM loans
            WHERE item_id = $1 AND status IN ('requested', 'active')
            "#,
        )
        .bind(item_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_loan).transpose()
    }
}
