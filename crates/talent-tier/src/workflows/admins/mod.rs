//! Administrator accounts, credential checks, and account management routes.

pub mod auth;
pub mod domain;
mod password;
pub mod router;
pub mod store;


pub use auth::{protect, AuthenticatedAdmin};
pub use domain::{AdminAccount, AdminId, AdminView, AuthProvider, NewAdmin};
pub use password::CredentialHasher;
pub use router::admin_account_router;
pub use store::{AdminStore, AdminStoreError, SEED_ADMIN_ID};
