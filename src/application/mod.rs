//! Application services layer.

pub mod error;
pub mod page;
pub mod speakers;
