//! Decides, per service, whether the desired environment differs enough
//! from the running one to need a deploy.

pub mod align;
pub mod changes;
pub mod compare;
pub mod pretty;

pub use changes::ChangeSet;
pub use compare::{compare, CompareOptions};
