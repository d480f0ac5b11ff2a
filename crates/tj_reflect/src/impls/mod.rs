//! Reflection for built-in and third-party types.
//!
//! ## Implemented Menu
//!
//! - `i8`-`i64`, `u8`-`u64`, `isize`, `usize`, `f32`, `f64`: `Number`
//! - `serde_json::Number`: `Number`
//! - `bool`: `Boolean`
//! - `String`: `String`
//! - `chrono::DateTime<Utc>`: `Date`
//! - `Vec<T>`: `Array` of `T`
//! - `Option<T>`: `T`, with `None` as an undefined value
//! - `Box<T>`: transparent; `Box<dyn Reflect>` is `Any`,
//!   `Box<dyn Trait>` is the trait object type

// -----------------------------------------------------------------------------
// Modules

mod collections;
mod date;
mod primitives;
