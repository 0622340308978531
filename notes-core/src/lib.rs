//! notes-core: framework-agnostic core for MultiNotes.
//!
//! Everything here is independent of HTTP and storage: the per-request
//! [`TenantContext`], plans and roles, the capability table, the before-hook
//! pipeline, configuration and the structured [`NotesError`].

pub mod capabilities;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod hooks;
pub mod tenant;

pub use capabilities::Capability;
pub use config::{ConfigError, ConfigSnapshot, NotesConfig};
pub use envelope::{ApiResponse, FormError};
pub use errors::{ErrorKind, NotesError, NotesResult};
pub use hooks::{BeforeHook, HookContext, RequireCapability, ServiceHooks, ServiceMethodKind};
pub use tenant::{slugify, Plan, Role, TenantContext, TenantId};
