//! Verification steps, one module per check

pub mod chain;
pub mod entry;
pub mod sct;
pub mod signature;
pub mod timestamps;
pub mod tlog;
