use super::catalog_service::CatalogDisplayInfo;
use super::member_directory::MemberInfo;
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 通知ポート
///
/// 会員への通知配信メカニズムを抽象化する。
/// 実装はメール、SMS、プッシュ通知などが考えられる。
///
/// 配信の成否は会員ごとに報告される。このサブシステムは
/// 失敗した通知を再送しない（リトライ方針は実装側の責務）。
#[allow(dead_code)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// 入荷待ちの会員に「貸出可能になった」通知を送信する
    ///
    /// ItemAvailableイベントのdispatch時に呼ばれる。
    /// タイムアウトを含む失敗は会員単位の失敗として扱われ、
    /// 同一バッチの他の会員への配信を妨げない。
    async fn notify_item_available(
        &self,
        member: &MemberInfo,
        display: &CatalogDisplayInfo,
    ) -> Result<()>;
}
