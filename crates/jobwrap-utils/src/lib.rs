pub mod atomic_write;
pub mod exit_codes;
pub mod logging;
pub mod payload_io;
pub mod ring_buffer;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use ring_buffer::LineRing;
