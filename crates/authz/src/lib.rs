//! Authentication for Libris: the token authority that maps opaque bearer
//! tokens to members, the password digest, and the axum guard that gates
//! mutating routes.

pub mod clock;
pub mod guard;
pub mod password;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use guard::AuthenticatedMember;
pub use token::{MemberId, TokenAuthority, TOKEN_TTL};
