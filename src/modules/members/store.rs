//! In-memory credential store.

use std::sync::{Mutex, MutexGuard, PoisonError};

use libris_authz::{password, MemberId};
use libris_http::AppError;
use thiserror::Error;

use super::models::{Member, MemberRecord, NewMember};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemberError {
    #[error("missing required fields")]
    MissingFields,

    #[error("username '{0}' is taken")]
    UsernameTaken(String),
}

impl From<MemberError> for AppError {
    fn from(err: MemberError) -> Self {
        match err {
            MemberError::MissingFields => {
                AppError::bad_request("Missing required fields").with_code("missing_fields")
            }
            MemberError::UsernameTaken(_) => {
                AppError::bad_request("Username already exists").with_code("username_taken")
            }
        }
    }
}

#[derive(Default)]
struct Roster {
    members: Vec<MemberRecord>,
    last_id: MemberId,
}

/// Registered members behind a single guard.
#[derive(Default)]
pub struct CredentialStore {
    roster: Mutex<Roster>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn roster(&self) -> MutexGuard<'_, Roster> {
        self.roster.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a member. Usernames are unique and compared exactly.
    pub fn register(&self, request: NewMember) -> Result<Member, MemberError> {
        let (Some(username), Some(password), Some(email)) =
            (request.username, request.password, request.email)
        else {
            return Err(MemberError::MissingFields);
        };

        let mut roster = self.roster();
        if roster.members.iter().any(|m| m.username == username) {
            return Err(MemberError::UsernameTaken(username));
        }

        roster.last_id += 1;
        let record = MemberRecord {
            id: roster.last_id,
            username,
            password_hash: password::digest(&password),
            email,
        };
        let member = Member::from(&record);
        roster.members.push(record);
        Ok(member)
    }

    /// Member whose username and password both match.
    pub fn find_by_credentials(&self, username: &str, password: &str) -> Option<Member> {
        self.roster()
            .members
            .iter()
            .find(|m| m.username == username && password::verify(password, &m.password_hash))
            .map(Member::from)
    }

    pub fn len(&self) -> usize {
        self.roster().members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
