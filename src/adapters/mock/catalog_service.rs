use crate::domain::value_objects::CatalogEntryId;
use crate::ports::catalog_service::{
    CatalogDisplayInfo, CatalogService as CatalogServiceTrait, Result,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// CatalogServiceのモック実装
///
/// タイトルを登録することで状態を持ったテストをサポート。
/// 未登録のカタログ項目には固定タイトルを返す。
#[allow(dead_code)]
pub struct CatalogService {
    titles: Mutex<HashMap<CatalogEntryId, String>>,
}

#[allow(dead_code)]
impl CatalogService {
    pub fn new() -> Self {
        Self {
            titles: Mutex::new(HashMap::new()),
        }
    }

    /// テスト用にカタログ項目のタイトルを登録
    pub fn add_entry(&self, catalog_entry_id: CatalogEntryId, title: &str) {
        self.titles
            .lock()
            .unwrap()
            .insert(catalog_entry_id, title.to_string());
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogServiceTrait for CatalogService {
    /// 登録済みタイトル、なければ固定タイトルを返す
    async fn get_display_info(
        &self,
        catalog_entry_id: CatalogEntryId,
    ) -> Result<CatalogDisplayInfo> {
        let title = self
            .titles
            .lock()
            .unwrap()
            .get(&catalog_entry_id)
            .cloned()
            .unwrap_or_else(|| "Mock Game Title".to_string());

        Ok(CatalogDisplayInfo {
            catalog_entry_id,
            title,
        })
    }
}
