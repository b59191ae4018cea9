use crate::domain::value_objects::{CatalogEntryId, MemberId};
use async_trait::async_trait;
use std::collections::HashSet;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 関心キューポート
///
/// カタログ項目ごとに「入荷待ち」の会員集合を保持する共有ストアを
/// 抽象化する。キーはカタログ項目ID、値は会員IDの集合。
///
/// このサブシステム唯一の正しさに関わるプリミティブは`drain`：
/// 読み取りとクリアを1回の原子的操作で行うこと。実装は
/// exists → 読み取り → 削除 の3回の呼び出しに分解してはならない。
/// 分解すると、同一カタログ項目の2物品が同時に返却されたとき、
/// 同じ会員集合を二重に読んで二重通知するか、他方がまだ走査中の
/// 集合をクリアして途中登録の会員を取りこぼす。
#[allow(dead_code)]
#[async_trait]
pub trait InterestQueue: Send + Sync {
    /// 会員をキーの集合に加える
    ///
    /// 冪等：既に存在する会員の追加は何もしない。
    async fn add_member(&self, key: CatalogEntryId, member_id: MemberId) -> Result<()>;

    /// 会員をキーの集合から除く
    ///
    /// 不在の会員の除去はエラーにしない。
    async fn remove_member(&self, key: CatalogEntryId, member_id: MemberId) -> Result<()>;

    /// キーに登録済みの会員がいるか
    async fn key_exists(&self, key: CatalogEntryId) -> Result<bool>;

    /// キーの会員集合を原子的に読み取ってクリアする
    ///
    /// 全か無か：部分的なdrainは存在しない。
    /// drain後に登録された会員は次回のdrainに含まれる。
    async fn drain(&self, key: CatalogEntryId) -> Result<HashSet<MemberId>>;
}
