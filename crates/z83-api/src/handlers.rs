//! Request handlers.

pub mod admin;
pub mod applications;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod notifications;
pub mod profile;

pub use admin::*;
pub use applications::*;
pub use auth::*;
pub use health::*;
pub use jobs::*;
pub use notifications::*;
pub use profile::*;
