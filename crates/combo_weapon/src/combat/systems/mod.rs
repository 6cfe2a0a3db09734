//! Combat systems (FixedUpdate)

mod contact;
mod cooldown;
mod motion;
mod refund;

#[cfg(test)]
mod cooldown_tests;
#[cfg(test)]
mod refund_tests;

// Re-export all systems
pub use contact::*;
pub use cooldown::*;
pub use motion::*;
pub use refund::*;
