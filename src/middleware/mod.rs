//! Router-level middleware: the authentication gate and its CORS sibling.

pub mod cors;
pub mod gate;
