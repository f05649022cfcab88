//! JavaScript bindings, generated with `wasm-bindgen`.

pub mod utils;
pub mod world;

pub use world::{DebugDraw3D, EntityRef3D, World3D};
