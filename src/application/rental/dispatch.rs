use futures::future::join_all;
use thiserror::Error;

use crate::domain::ItemAvailable;
use crate::domain::value_objects::{CatalogEntryId, MemberId};
use crate::ports::CatalogDisplayInfo;

use super::loan_service::ServiceDependencies;

/// dispatch全体の失敗
///
/// どちらの場合も会員への通知は1件も行われていない。
/// 呼び出し元（spawnされたタスク）はログに記録するのみで、
/// 返却・却下を行った会員には決して伝播しない。
#[derive(Debug, Error)]
pub enum DispatchError {
    /// 関心キューストアに到達できない（drainは全か無か：部分的な
    /// drain状態は存在しない）
    #[error("Interest store unavailable")]
    StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// カタログ表示情報の取得に失敗
    #[error("Catalog lookup failed")]
    CatalogLookupFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// dispatchバッチの結果
///
/// 会員単位の失敗（会員不在・通知失敗）はここに記録され、
/// 再送はされない。観測用であり、どの呼び出し元にもエラーとして
/// 伝播しない。
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub catalog_entry_id: CatalogEntryId,
    /// drainで取り出した会員数
    pub drained: usize,
    /// 通知に成功した会員
    pub notified: Vec<MemberId>,
    /// 解決できずスキップした会員（退会など）
    pub skipped: Vec<MemberId>,
    /// 通知に失敗した会員と理由
    pub failed: Vec<(MemberId, String)>,
}

impl DispatchReport {
    fn empty(catalog_entry_id: CatalogEntryId) -> Self {
        Self {
            catalog_entry_id,
            drained: 0,
            notified: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// 会員1人分の通知結果
enum MemberOutcome {
    Notified(MemberId),
    Skipped(MemberId),
    Failed(MemberId, String),
}

/// 返却イベントのdispatch（純粋な関数）
///
/// ItemAvailableイベントを受け取り、該当カタログ項目の待機会員へ
/// 通知する。
///
/// 処理フロー：
/// 1. 関心キューストアをdrain（原子的な読み取り＋クリア）
/// 2. 空なら終了（Notifier呼び出しゼロ、会員解決ゼロ）
/// 3. カタログ項目の表示情報を取得
/// 4. 各会員を独立に処理：会員を解決し（不在はスキップして継続）、
///    通知を送る（失敗しても他の会員への配信は継続）
///
/// 冪等性：drainがイテレーション開始前に原子的にエントリを消すため、
/// 一度drainされた会員が同じ返却イベントで再通知されることはない。
/// 同一カタログ項目の2つの返却が競合しても、2回目のdrainは1回目の
/// 完了後に蓄積した関心のみを観測する。
///
/// 順序保証：バッチ内の会員間に順序はない（並行に通知する）。
/// 失敗した会員の再キューイングは行わない。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `event` - 返却・却下が発行したItemAvailableイベント
///
/// # 戻り値
/// バッチの結果（通知成功・スキップ・失敗の内訳）
#[allow(dead_code)]
pub async fn dispatch_item_available(
    deps: &ServiceDependencies,
    event: ItemAvailable,
) -> std::result::Result<DispatchReport, DispatchError> {
    let key = event.catalog_entry_id;

    // 1. 原子的drain：読み取りとクリアを1回のストア操作で行う。
    //    exists → 読み取り → 削除 と分解してはならない（二重通知と
    //    登録の取りこぼしの競合窓になる）
    let members = deps
        .interest_queue
        .drain(key)
        .await
        .map_err(DispatchError::StoreUnavailable)?;

    // 2. 関心なしは通常ケース：何もしない
    if members.is_empty() {
        tracing::debug!(
            catalog_entry_id = %key.value(),
            "no interest registered, dispatch is a no-op"
        );
        return Ok(DispatchReport::empty(key));
    }

    // 3. 通知メッセージ用の表示情報
    let display_info = deps
        .catalog_service
        .get_display_info(key)
        .await
        .map_err(DispatchError::CatalogLookupFailed)?;

    // 4. 会員ごとに独立して通知（1件の失敗が他を妨げない）
    let outcomes = join_all(
        members
            .iter()
            .map(|&member_id| notify_member(deps, &display_info, member_id)),
    )
    .await;

    let mut report = DispatchReport::empty(key);
    report.drained = members.len();

    for outcome in outcomes {
        match outcome {
            MemberOutcome::Notified(member_id) => report.notified.push(member_id),
            MemberOutcome::Skipped(member_id) => report.skipped.push(member_id),
            MemberOutcome::Failed(member_id, reason) => report.failed.push((member_id, reason)),
        }
    }

    tracing::info!(
        catalog_entry_id = %key.value(),
        drained = report.drained,
        notified = report.notified.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "availability dispatch completed"
    );

    Ok(report)
}

/// 会員1人を解決して通知する
///
/// 失敗はすべて会員単位に局所化される（バッチは中断しない）。
async fn notify_member(
    deps: &ServiceDependencies,
    display_info: &CatalogDisplayInfo,
    member_id: MemberId,
) -> MemberOutcome {
    let member = match deps.member_directory.resolve(member_id).await {
        Ok(Some(member)) => member,
        Ok(None) => {
            tracing::warn!(
                member_id = %member_id.value(),
                "member no longer exists, skipping notification"
            );
            return MemberOutcome::Skipped(member_id);
        }
        Err(e) => {
            tracing::warn!(
                member_id = %member_id.value(),
                error = %e,
                "member lookup failed, skipping notification"
            );
            return MemberOutcome::Failed(member_id, e.to_string());
        }
    };

    match deps.notifier.notify_item_available(&member, display_info).await {
        Ok(()) => MemberOutcome::Notified(member_id),
        Err(e) => {
            tracing::warn!(
                member_id = %member_id.value(),
                catalog_entry_id = %display_info.catalog_entry_id.value(),
                error = %e,
                "notification failed"
            );
            MemberOutcome::Failed(member_id, e.to_string())
        }
    }
}
