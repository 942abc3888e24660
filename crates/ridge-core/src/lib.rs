//! ridge-core: the byte-level primitives behind the ridge boundary.
//! Pure functions over byte slices; nothing here knows about raw pointers.

pub mod crypto;
pub mod frame;
pub mod header;
pub mod hpack;
pub mod huffman;
pub mod tls;
pub mod wire;

pub use frame::{Frame, FrameType};
pub use header::Header;
pub use tls::KeyBundle;
