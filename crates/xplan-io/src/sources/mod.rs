//! Built-in data sources that need no backend.

pub mod synthetic;

pub use synthetic::{demo_technologies, discount_factor, fallback_rows};
