//! # Lectern Core
//!
//! Pure retrieval logic for Lectern: data models, word-window chunking,
//! the exact L2 vector index, the co-located record store, the embedding
//! trait, and the top-k retrieval algorithm.
//!
//! This crate performs no filesystem or network I/O. Persistence, text
//! extraction, and concrete embedding providers live in the `lectern`
//! app crate.

pub mod chunk;
pub mod embedding;
pub mod error;
pub mod index;
pub mod models;
pub mod retrieve;
pub mod store;
