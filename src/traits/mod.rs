//! Trait definitions for Cloud API operations.
//!
//! Each entity type implements the traits it supports, encapsulating
//! path and status-code differences in the implementations.

mod create;
mod delete;
mod get;
mod list;
mod update;

pub use create::Create;
pub use delete::Delete;
pub use get::Get;
pub use list::List;
pub use update::Update;
