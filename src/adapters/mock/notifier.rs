use crate::domain::value_objects::{CatalogEntryId, MemberId};
use crate::ports::catalog_service::CatalogDisplayInfo;
use crate::ports::member_directory::MemberInfo;
use crate::ports::notifier::{Notifier as NotifierTrait, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// Mock implementation of Notifier
///
/// Records every delivered notification so tests can assert
/// exactly-once delivery. Individual members can be marked as
/// failing to exercise partial-failure handling.
#[allow(dead_code)]
pub struct Notifier {
    sent: Mutex<Vec<(MemberId, CatalogEntryId)>>,
    failing_members: Mutex<HashSet<MemberId>>,
}

#[allow(dead_code)]
impl Notifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_members: Mutex::new(HashSet::new()),
        }
    }

    /// Make deliveries to this member fail, for testing purposes
    pub fn fail_for(&self, member_id: MemberId) {
        self.failing_members.lock().unwrap().insert(member_id);
    }

    /// All successfully delivered notifications, in delivery order
    pub fn sent(&self) -> Vec<(MemberId, CatalogEntryId)> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of deliveries made to a member
    pub fn sent_count_for(&self, member_id: MemberId) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| *m == member_id)
            .count()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotifierTrait for Notifier {
    /// Record the delivery, or fail if the member was marked as failing
    async fn notify_item_available(
        &self,
        member: &MemberInfo,
        display: &CatalogDisplayInfo,
    ) -> Result<()> {
        if self.failing_members.lock().unwrap().contains(&member.member_id) {
            return Err(format!("delivery to {} refused", member.email).into());
        }

        self.sent
            .lock()
            .unwrap()
            .push((member.member_id, display.catalog_entry_id));
        Ok(())
    }
}
