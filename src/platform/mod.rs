//! Platform abstraction layer
//!
//! The core never reads sensors or clocks. On the web, the JS host samples
//! DeviceMotion gravity and the animation-frame clock and feeds them to
//! [`web::WebGame`]; ghosts persist to LocalStorage.

#[cfg(target_arch = "wasm32")]
pub mod web;
