use crate::domain::item::{Availability, Item};
use crate::domain::value_objects::{CatalogEntryId, ItemCondition, ItemId, MemberId};
use crate::ports::item_repository::{ItemRepository as ItemRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::str::FromStr;
use uuid::Uuid;

/// PostgreSQLの行データをItemに変換する
///
/// availability列とholder_id列の組み合わせを検証し、
/// 不正な組み合わせ（held + 保持者なし 等）はエラーにする。
fn map_row_to_item(row: &PgRow) -> Result<Item> {
    let condition_str: &str = row.get("condition");
    let condition = ItemCondition::from_str(condition_str).map_err(|e| {
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            as Box<dyn std::error::Error + Send + Sync>
    })?;

    let availability_str: &str = row.get("availability");
    let holder_id: Option<Uuid> = row.get("holder_id");
    let availability = match (availability_str, holder_id) {
        ("available", None) => Availability::Available,
        ("held", Some(holder)) => Availability::Held {
            holder: MemberId::from_uuid(holder),
        },
        (state, holder) => {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("inconsistent availability: state={}, holder={:?}", state, holder),
            )));
        }
    };

    Ok(Item {
        item_id: ItemId::from_uuid(row.get("item_id")),
        catalog_entry_id: CatalogEntryId::from_uuid(row.get("catalog_entry_id")),
        condition,
        availability,
        version: row.get("version"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// ItemRepositoryのPostgreSQL実装
///
/// version列による楽観的同時実行制御で、同一物品への
/// 並行した状態遷移の勝者を1人に限定する。
#[allow(dead_code)]
pub struct ItemRepository {
    pool: PgPool,
}

#[allow(dead_code)]
impl ItemRepository {
    /// PostgreSQLコネクションプールから新しいItemRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepositoryTrait for ItemRepository {
    async fn insert(&self, item: Item) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO items (
                item_id,
                catalog_entry_id,
                condition,
                availability,
                holder_id,
                version,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(item.item_id.value())
        .bind(item.catalog_entry_id.value())
        .bind(item.condition.as_str())
        .bind(if item.availability.is_available() {
            "available"
        } else {
            "held"
        })
        .bind(item.availability.holder().map(|h| h.value()))
        .bind(item.version)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, item_id: ItemId) -> Result<Option<Item>> {
        let row = sqlx::query(
            r#"
            SELECT
                item_id,
                catalog_entry_id,
                condition,
                availability,
                holder_id,
                version,
                created_at,
                updated_at
            FROM items
            WHERE item_id = $1
            "#,
        )
        .bind(item_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_item).transpose()
    }

    /// 楽観的チェック付き更新
    ///
    /// WHERE句でversionを照合する1文のUPDATE。行が一致しなかった
    /// （＝他の書き込みが先行した）場合は`Ok(false)`を返す。
    async fn update(&self, item: &Item, expected_version: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET
                condition = $3,
                availability = $4,
                holder_id = $5,
                version = $6,
                updated_at = $7
            WHERE item_id = $1 AND version = $2
            "#,
        )
        .bind(item.item_id.value())
        .bind(expected_version)
        .bind(item.condition.as_str())
        .bind(if item.availability.is_available() {
            "available"
        } else {
            "held"
        })
        .bind(item.availability.holder().map(|h| h.value()))
        .bind(item.version)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// 貸出中でない場合のみ削除（Held物品の削除は拒否）
    async fn delete_if_available(&self, item_id: ItemId) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM items
            WHERE item_id = $1 AND availability = 'available'
            "#,
        )
        .bind(item_id.value())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_available_by_catalog_entry(
        &self,
        catalog_entry_id: CatalogEntryId,
    ) -> Result<Vec<Item>> {
        let rows = sqlx::query(
            r#"
            SELECT
                item_id,
                catalog_entry_id,
                condition,
                availability,
                holder_id,
                version,
                created_at,
                updated_at
            FROM items
            WHERE catalog_entry_id = $1 AND availability = 'available'
            ORDER BY created_at ASC
            "#,
        )
        .bind(catalog_entry_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_item).collect()
    }
}
