mod api;
mod client;
mod client_utils;
mod errors;
mod opentelemetry;
pub mod rag_client_test;
mod types;
mod types_ext;
mod vector_service;

pub use client::{RagVectorClient, DEFAULT_BASE_URL};
pub use errors::*;
pub use types::*;
pub use vector_service::VectorService;
