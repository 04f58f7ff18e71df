pub mod admins;
pub mod candidates;
mod contact;

pub use contact::is_valid_email;
