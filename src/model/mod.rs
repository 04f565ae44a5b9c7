pub mod deployment;
pub mod environment;
pub mod gist;
pub mod quantity;
pub mod resource;
pub mod service;

pub use deployment::*;
pub use environment::*;
pub use gist::*;
pub use quantity::*;
pub use resource::*;
pub use service::*;
