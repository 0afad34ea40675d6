pub mod backend;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
pub mod keys;
pub mod local;
pub mod memory;
