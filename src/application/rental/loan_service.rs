use crate::domain::{self, ItemAvailable, commands::*, value_objects::*};
use crate::ports::*;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::dispatch::dispatch_item_available;
use super::errors::{RentalError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
///
/// このパターンにより：
/// - すべての依存が明示的
/// - データと振る舞いの分離
/// - 関数合成が容易
/// - テストが明確
#[derive(Clone)]
#[allow(dead_code)]
pub struct ServiceDependencies {
    pub item_repository: Arc<dyn ItemRepository>,
    pub loan_repository: Arc<dyn LoanRepository>,
    pub interest_queue: Arc<dyn InterestQueue>,
    pub member_directory: Arc<dyn MemberDirectory>,
    pub catalog_service: Arc<dyn CatalogService>,
    pub notifier: Arc<dyn Notifier>,
}

/// リポジトリから貸出集約を取得するヘルパー関数
///
/// activate_loan, decline_loan, return_loanで共通利用される。
async fn load_loan(
    loan_repository: &Arc<dyn LoanRepository>,
    loan_id: LoanId,
) -> Result<domain::loan::Loan> {
    loan_repository
        .get(loan_id)
        .await
        .map_err(RentalError::LoanRepositoryError)?
        .ok_or(RentalError::LoanNotFound)
}

/// 貸出を申し込む（純粋な関数）
///
/// ビジネスルール：
/// - 物品が存在しAvailableであること
/// - 貸出期間が正当であること（終了 >= 開始、開始は過去でない）
/// - 成功時に物品はHeld（保持者 = 借りる会員）、貸出はRequestedになる
///
/// すべての依存が引数として明示的に渡される（関数型の原則）。
///
/// # 同時実行
///
/// 同一物品への並行申込は物品のversionによる楽観的チェックで
/// 高々1人の勝者に限定される。敗者には`ItemUnavailable`が返り、
/// 貸出レコードは作成されない。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 貸出申込コマンド
///
/// # 戻り値
/// 成功時は作成された貸出のID
#[allow(dead_code)]
pub async fn request_loan(deps: &ServiceDependencies, cmd: RequestLoan) -> Result<LoanId> {
    // 1. 物品の取得
    let item = deps
        .item_repository
        .get(cmd.item_id)
        .await
        .map_err(RentalError::ItemRepositoryError)?
        .ok_or(RentalError::ItemNotFound)?;

    // 2. 貸出可否の事前確認（早期リジェクト。最終判定は4の楽観的チェック）
    if !item.availability.is_available() {
        return Err(RentalError::ItemUnavailable);
    }

    // 3. ドメイン層の純粋関数を呼び出し（期間の検証を含む）
    let (requested, event) = domain::loan::request_loan(
        cmd.item_id,
        cmd.borrower_id,
        cmd.starts_on,
        cmd.ends_on,
        cmd.requested_at,
    )
    .map_err(|e| match e {
        domain::RequestLoanError::InvalidWindow(w) => RentalError::InvalidWindow(w),
    })?;

    // 4. 物品をHeldへ遷移し、楽観的チェック付きで保存
    //    競合は並行申込の敗者を意味する
    let held = domain::item::hold_item(&item, cmd.borrower_id, cmd.requested_at)
        .map_err(|_| RentalError::ItemUnavailable)?;

    let saved = deps
        .item_repository
        .update(&held, item.version)
        .await
        .map_err(RentalError::ItemRepositoryError)?;

    if !saved {
        return Err(RentalError::ItemUnavailable);
    }

    // 5. 貸出レコードを保存。失敗時は保持を取り消す：
    //    Heldの物品は未終了の貸出と常に対でなければならず、
    //    対になる貸出のないHeld物品は解放する手段を失う
    let loan_id = requested.loan_id;
    if let Err(e) = deps
        .loan_repository
        .insert(domain::loan::Loan::Requested(requested))
        .await
    {
        revert_hold(deps, &held).await;
        return Err(RentalError::LoanRepositoryError(e));
    }

    tracing::info!(
        loan_id = %loan_id.value(),
        item_id = %event.item_id.value(),
        borrower_id = %event.borrower_id.value(),
        "loan requested"
    );

    Ok(loan_id)
}

/// 貸出を開始する（純粋な関数）
///
/// ビジネスルール：
/// - 貸出が存在しRequested状態であること
/// - 物品への副作用なし（申込時点で既にHeld）
#[allow(dead_code)]
pub async fn activate_loan(deps: &ServiceDependencies, cmd: ActivateLoan) -> Result<()> {
    // 1. 貸出集約を取得
    let loan = load_loan(&deps.loan_repository, cmd.loan_id).await?;

    // 2. ドメイン層の純粋関数を呼び出し
    let (active, event) = domain::loan::activate_loan(loan, cmd.activated_at).map_err(|e| {
        RentalError::InvalidLoanState(match e {
            domain::ActivateLoanError::AlreadyActive => "Loan is already active".to_string(),
            domain::ActivateLoanError::AlreadyReturned => {
                "Cannot activate returned loan".to_string()
            }
            domain::ActivateLoanError::AlreadyDeclined => {
                "Cannot activate declined loan".to_string()
            }
        })
    })?;

    // 3. 貸出の現在状態を保存
    deps.loan_repository
        .update(&domain::loan::Loan::Active(active))
        .await
        .map_err(RentalError::LoanRepositoryError)?;

    tracing::info!(loan_id = %event.loan_id.value(), "loan activated");

    Ok(())
}

/// 貸出申込を却下する（純粋な関数）
///
/// ビジネスルール：
/// - 貸出が存在しRequested状態であること
/// - 物品はAvailableに戻り、保持者はクリアされる
/// - ItemAvailableイベントが発火する：申込が物品を保持していた以上、
///   却下は実際に在庫を解放するため、待機会員への通知対象となる
///
/// 戻り値のイベントは発行済みの事実。dispatchはスケジュールのみで、
/// この関数は通知の完了を待たない。
#[allow(dead_code)]
pub async fn decline_loan(deps: &ServiceDependencies, cmd: DeclineLoan) -> Result<ItemAvailable> {
    // 1. 貸出集約を取得
    let loan = load_loan(&deps.loan_repository, cmd.loan_id).await?;
    let item_id = loan.item_id();
    let prior = loan.clone();

    // 2. ドメイン層の純粋関数を呼び出し
    let (declined, event) = domain::loan::decline_loan(loan, cmd.declined_at).map_err(|e| {
        RentalError::InvalidLoanState(match e {
            domain::DeclineLoanError::AlreadyActive => "Cannot decline active loan".to_string(),
            domain::DeclineLoanError::AlreadyReturned => "Cannot decline returned loan".to_string(),
            domain::DeclineLoanError::AlreadyDeclined => "Loan is already declined".to_string(),
        })
    })?;

    // 3. 貸出の現在状態を保存
    deps.loan_repository
        .update(&domain::loan::Loan::Declined(declined))
        .await
        .map_err(RentalError::LoanRepositoryError)?;

    tracing::info!(loan_id = %event.loan_id.value(), "loan declined");

    // 4. 物品を解放し、dispatchをスケジュール。解放に失敗した場合は
    //    貸出を元の状態へ戻す（終端の貸出とHeldの物品を残さない）
    match release_item_and_schedule_dispatch(deps, item_id, cmd.declined_at).await {
        Ok(available) => Ok(available),
        Err(e) => {
            revert_loan(deps, &prior).await;
            Err(e)
        }
    }
}

/// 貸出品を返却する（純粋な関数）
///
/// ビジネスルール：
/// - 貸出が存在しActive状態であること
/// - 物品はAvailableに戻り、保持者はクリアされる
/// - ItemAvailableイベントが発火し、待機会員への通知対象となる
///
/// 戻り値のイベントは発行済みの事実。dispatchはスケジュールのみで、
/// この関数は通知の完了を待たない（返却した会員は通知の遅延や失敗を
/// 一切観測しない）。
#[allow(dead_code)]
pub async fn return_loan(deps: &ServiceDependencies, cmd: ReturnLoan) -> Result<ItemAvailable> {
    // 1. 貸出集約を取得
    let loan = load_loan(&deps.loan_repository, cmd.loan_id).await?;
    let item_id = loan.item_id();
    let prior = loan.clone();

    // 2. ドメイン層の純粋関数を呼び出し
    let (returned, event) = domain::loan::return_loan(loan, cmd.returned_at).map_err(|e| {
        RentalError::InvalidLoanState(match e {
            domain::ReturnLoanError::NotYetActive => "Cannot return loan before activation".to_string(),
            domain::ReturnLoanError::AlreadyReturned => "Loan is already returned".to_string(),
            domain::ReturnLoanError::AlreadyDeclined => "Cannot return declined loan".to_string(),
        })
    })?;

    // 3. 貸出の現在状態を保存
    deps.loan_repository
        .update(&domain::loan::Loan::Returned(returned))
        .await
        .map_err(RentalError::LoanRepositoryError)?;

    tracing::info!(loan_id = %event.loan_id.value(), "loan returned");

    // 4. 物品を解放し、dispatchをスケジュール。解放に失敗した場合は
    //    貸出を元の状態へ戻す（終端の貸出とHeldの物品を残さない）
    match release_item_and_schedule_dispatch(deps, item_id, cmd.returned_at).await {
        Ok(available) => Ok(available),
        Err(e) => {
            revert_loan(deps, &prior).await;
            Err(e)
        }
    }
}

/// 申込の保持を取り消す（ベストエフォート）
///
/// 貸出レコードの保存に失敗した場合に呼ばれ、物品をAvailableに戻す。
/// ItemAvailableイベントは発火しない：外部から見て在庫は一度も
/// 減っていない。取り消し自体の失敗はログに残すのみ。
async fn revert_hold(deps: &ServiceDependencies, held: &domain::item::Item) {
    let Ok((reverted, _)) = domain::item::release_item(held, held.updated_at) else {
        return;
    };

    match deps.item_repository.update(&reverted, held.version).await {
        Ok(true) => {}
        Ok(false) => tracing::error!(
            item_id = %held.item_id.value(),
            "hold revert lost an optimistic check after a failed loan insert"
        ),
        Err(e) => tracing::error!(
            item_id = %held.item_id.value(),
            error = %e,
            "failed to revert hold after a failed loan insert"
        ),
    }
}

/// 貸出を直前の未終了状態へ戻す（ベストエフォート）
///
/// 物品の解放に失敗した場合に呼ばれる。戻せなかった場合は
/// ログに残すのみ。
async fn revert_loan(deps: &ServiceDependencies, prior: &domain::loan::Loan) {
    if let Err(e) = deps.loan_repository.update(prior).await {
        tracing::error!(
            loan_id = %prior.loan_id().value(),
            error = %e,
            "failed to revert loan state after a failed item release"
        );
    }
}

/// 物品を解放してItemAvailableイベントを生成し、dispatchをスケジュールする
///
/// return_loanとdecline_loanの共通後段。dispatchは独立した
/// 作業単位（tokio::spawn）として実行され、呼び出し元は
/// Notifierの遅延に一切ブロックされない。
async fn release_item_and_schedule_dispatch(
    deps: &ServiceDependencies,
    item_id: ItemId,
    occurred_at: DateTime<Utc>,
) -> Result<ItemAvailable> {
    let item = deps
        .item_repository
        .get(item_id)
        .await
        .map_err(RentalError::ItemRepositoryError)?
        .ok_or(RentalError::ItemNotFound)?;

    let (released, event) = domain::item::release_item(&item, occurred_at)
        .map_err(|_| RentalError::InvalidLoanState("Item is not held".to_string()))?;

    // Held物品への書き込みは貸出終了のこの経路のみなので、
    // ここでの楽観的チェック失敗は不整合を意味する
    let saved = deps
        .item_repository
        .update(&released, item.version)
        .await
        .map_err(RentalError::ItemRepositoryError)?;

    if !saved {
        return Err(RentalError::ItemRepositoryError(
            format!("Conflicting update on held item {}", item_id.value()).into(),
        ));
    }

    tracing::debug!(
        event = %serde_json::to_string(&event).unwrap_or_default(),
        "item released, availability dispatch scheduled"
    );

    let dispatch_deps = deps.clone();
    tokio::spawn(async move {
        if let Err(e) = dispatch_item_available(&dispatch_deps, event).await {
            tracing::error!(
                catalog_entry_id = %event.catalog_entry_id.value(),
                error = %e,
                "availability dispatch failed"
            );
        }
    });

    Ok(event)
}
