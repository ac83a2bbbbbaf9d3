/// Utility module - small helpers shared by the memory module

pub mod align;

pub use align::*;
