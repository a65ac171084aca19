//! Cloud API model types.

mod datacenter;
mod request;
mod resource;
mod server;
mod snapshot;
mod volume;

pub use datacenter::*;
pub use request::*;
pub use resource::*;
pub use server::*;
pub use snapshot::*;
pub use volume::*;
