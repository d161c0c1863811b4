//! Bounded Ring Buffer
//!
//! Fixed-capacity FIFO storage for per-frame signal history. Pushing into a
//! full buffer evicts the oldest sample.

mod buffer;

pub use buffer::{RingBuffer, DEFAULT_CAPACITY};
