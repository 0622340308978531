//! notes-auth: session cookies and local authentication for MultiNotes.

pub mod cookie;
pub mod options;
pub mod password;
pub mod session;
pub mod strategy;

pub use options::{parse_ttl, AuthConfigError, SessionOptions, DEFAULT_COOKIE_NAME};
pub use password::PasswordHasher;
pub use session::{SessionManager, SessionUser};
pub use strategy::{CredentialResolver, Credentials, LocalStrategy};
