//! Filesystem utilities for op.

pub mod atomic;

pub use atomic::atomic_write_file;
