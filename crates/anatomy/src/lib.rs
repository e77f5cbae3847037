pub mod error;
mod template;

pub use crate::template::Anatomy;
pub use crate::template::DEFAULT_PUBLISH_TEMPLATE;
