use libris_authz::MemberId;
use serde::{Deserialize, Serialize};

/// Public view of a member; the password digest is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub username: String,
    pub email: String,
}

/// Registration payload. Every field must be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMember {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Stored record, including the digest.
#[derive(Debug, Clone)]
pub(crate) struct MemberRecord {
    pub id: MemberId,
    pub username: String,
    pub password_hash: String,
    pub email: String,
}

impl From<&MemberRecord> for Member {
    fn from(record: &MemberRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.clone(),
            email: record.email.clone(),
        }
    }
}
