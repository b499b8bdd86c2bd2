//! Middleware module
//!
//! Contains request logging middleware

pub mod logging;
