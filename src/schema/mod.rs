pub mod builder;
pub mod dependencies;
pub mod entity;
pub mod tables;
pub mod types;

pub use builder::build;
pub use dependencies::*;
pub use entity::*;
pub use tables::*;
pub use types::*;
