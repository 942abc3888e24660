//! libridge: the boundary between a host runtime and ridge-core.
//!
//! Built as a `cdylib` the crate exports one `extern "C"` symbol per
//! operation (see [`exports`]) plus `ridge_alloc` / `ridge_dealloc` /
//! `ridge_free` for memory. Every call copies its arguments in, runs one
//! primitive, and returns a length-prefixed result the host must free.
//!
//! The boundary is single-threaded and stateless: nothing survives a call
//! except the exported result buffer.
//!
//! On native targets [`host::Host`] drives the same exports in-process.

pub mod bridge;
pub mod dispatch;
pub mod exports;

#[cfg(not(target_arch = "wasm32"))]
pub mod host;

pub use dispatch::Op;

#[cfg(not(target_arch = "wasm32"))]
pub use host::Host;
