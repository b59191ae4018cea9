use crate::domain::value_objects::{CatalogEntryId, MemberId};
use crate::ports::interest_queue::{InterestQueue as InterestQueueTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use uuid::Uuid;

/// InterestQueueのPostgreSQL実装
///
/// (catalog_entry_id, member_id)の複合主キーが集合の一意性を与える。
///
/// drainは単一の`DELETE ... RETURNING`文：読み取りとクリアが
/// サーバー側で1回の原子的操作として実行される。exists確認 →
/// 全件取得 → キー削除 の3回の呼び出しに分解すると、同一カタログ
/// 項目の並行する2つの返却が同じ会員集合を二重に読む競合窓が
/// 生まれるため、行わない。
#[allow(dead_code)]
pub struct InterestQueue {
    pool: PgPool,
}

#[allow(dead_code)]
impl InterestQueue {
    /// PostgreSQLコネクションプールから新しいInterestQueueを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InterestQueueTrait for InterestQueue {
    /// 冪等な追加（ON CONFLICT DO NOTHING）
    async fn add_member(&self, key: CatalogEntryId, member_id: MemberId) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO interest_queue (catalog_entry_id, member_id)
            VALUES ($1, $2)
            ON CONFLICT (catalog_entry_id, member_id) DO NOTHING
            "#,
        )
        .bind(key.value())
        .bind(member_id.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 不在の会員の除去はno-op（影響行数は確認しない）
    async fn remove_member(&self, key: CatalogEntryId, member_id: MemberId) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM interest_queue
            WHERE catalog_entry_id = $1 AND member_id = $2
            "#,
        )
        .bind(key.value())
        .bind(member_id.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn key_exists(&self, key: CatalogEntryId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM interest_queue WHERE catalog_entry_id = $1
            )
            "#,
        )
        .bind(key.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// 原子的drain：1文で読み取りとクリアを行う
    async fn drain(&self, key: CatalogEntryId) -> Result<HashSet<MemberId>> {
        let rows = sqlx::query(
            r#"
            DELETE FROM interest_queue
            WHERE catalog_entry_id = $1
            RETURNING member_id
            "#,
        )
        .bind(key.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| MemberId::from_uuid(row.get::<Uuid, _>("member_id")))
            .collect())
    }
}
