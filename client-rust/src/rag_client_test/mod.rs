//! Test doubles for the vector service.

mod service;

pub use service::*;
