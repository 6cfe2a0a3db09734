//! Combat components

pub mod contact;
pub mod cooldown;
pub mod motion;


// Re-export all components
pub use contact::*;
pub use cooldown::*;
pub use motion::*;
