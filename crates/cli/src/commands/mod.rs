pub mod builtins;
pub mod call;
pub mod client;
pub mod objects;

pub use builtins::*;
pub use call::*;
pub use client::*;
pub use objects::*;
