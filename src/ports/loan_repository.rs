use crate::domain::loan::Loan;
use crate::domain::value_objects::{ItemId, LoanId};
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出リポジトリポート
///
/// Loan集約の永続化を抽象化する。
/// ステータスは単調にのみ進むため、バージョン管理は不要
/// （物品の保持権はItemRepositoryの楽観的チェックが守る）。
#[allow(dead_code)]
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// 貸出を新規登録する
    async fn insert(&self, loan: Loan) -> Result<()>;

    /// IDで貸出を取得する
    async fn get(&self, loan_id: LoanId) -> Result<Option<Loan>>;

    /// 貸出の現在状態を保存する
    async fn update(&self, loan: &Loan) -> Result<()>;

    /// 物品を参照している未終了の貸出を検索する
    ///
    /// 不変条件「1物品につき未終了の貸出は高々1件」の検証と、
    /// Held ⇔ 未終了貸出あり の導出に使用される。
    async fn find_open_for_item(&self, item_id: ItemId) -> Result<Option<Loan>>;
}
