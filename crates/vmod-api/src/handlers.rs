//! Request handlers.

pub mod admin;
pub mod analyze;
pub mod frame;
pub mod health;
pub mod insights;

pub use admin::*;
pub use analyze::*;
pub use frame::*;
pub use health::*;
pub use insights::*;
