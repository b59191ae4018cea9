use crate::domain::value_objects::MemberId;
use crate::ports::member_directory::{MemberDirectory as MemberDirectoryTrait, MemberInfo, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock implementation of MemberDirectory
///
/// Supports stateful testing by storing member records.
/// Unregistered member ids resolve to None, which the dispatcher
/// treats as "member no longer exists".
#[allow(dead_code)]
pub struct MemberDirectory {
    members: Mutex<HashMap<MemberId, MemberInfo>>,
}

#[allow(dead_code)]
impl MemberDirectory {
    pub fn new() -> Self {
        Self {
            members: Mutex::new(HashMap::new()),
        }
    }

    /// Add a member for testing purposes
    pub fn add_member(&self, member_id: MemberId, name: &str, email: &str) {
        self.members.lock().unwrap().insert(
            member_id,
            MemberInfo {
                member_id,
                name: name.to_string(),
                email: email.to_string(),
            },
        );
    }

    /// Remove a member, simulating an account deletion
    pub fn remove_member(&self, member_id: MemberId) {
        self.members.lock().unwrap().remove(&member_id);
    }
}

impl Default for MemberDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberDirectoryTrait for MemberDirectory {
    /// Resolve a member from the registered records
    async fn resolve(&self, member_id: MemberId) -> Result<Option<MemberInfo>> {
        Ok(self.members.lock().unwrap().get(&member_id).cloned())
    }
}
