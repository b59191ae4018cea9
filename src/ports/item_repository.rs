use crate::domain::item::Item;
use crate::domain::value_objects::{CatalogEntryId, ItemId};
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 物品リポジトリポート
///
/// Item集約の永続化を抽象化する。
/// 更新は楽観的同時実行制御（versionの照合）で行われ、
/// 同一物品への並行した貸出申込の勝者を1人に限定する。
#[allow(dead_code)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// 物品を新規登録する
    async fn insert(&self, item: Item) -> Result<()>;

    /// IDで物品を取得する
    async fn get(&self, item_id: ItemId) -> Result<Option<Item>>;

    /// 楽観的チェック付き更新
    ///
    /// `expected_version`が保存済みのversionと一致する場合のみ更新する。
    /// 競合（他の書き込みが先行した）場合は`Ok(false)`を返す。
    /// 書き込みは物品単位で原子的でなければならない。
    async fn update(&self, item: &Item, expected_version: i64) -> Result<bool>;

    /// 貸出中でない場合のみ物品を削除する
    ///
    /// 未終了の貸出が参照している物品（Held状態）の削除は拒否され、
    /// `Ok(false)`を返す。
    async fn delete_if_available(&self, item_id: ItemId) -> Result<bool>;

    /// カタログ項目の貸出可能な物品を検索する
    ///
    /// カタログ単位の貸出可否はこのクエリで導出する
    /// （共有カウンタは持たない）。
    async fn find_available_by_catalog_entry(
        &self,
        catalog_entry_id: CatalogEntryId,
    ) -> Result<Vec<Item>>;
}
