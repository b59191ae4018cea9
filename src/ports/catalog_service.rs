use crate::domain::value_objects::CatalogEntryId;
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// カタログ項目の表示情報
///
/// 通知メッセージでわかりやすい表示をするために使用される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDisplayInfo {
    pub catalog_entry_id: CatalogEntryId,
    pub title: String,
}

/// カタログサービスポート
///
/// 貸出コンテキストとカタログコンテキストの境界を維持する。
/// 貸出コンテキストはCatalogEntryIDのみを知り、品目詳細は知らない。
#[allow(dead_code)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// カタログ項目の表示情報を取得する
    async fn get_display_info(&self, catalog_entry_id: CatalogEntryId)
        -> Result<CatalogDisplayInfo>;
}
