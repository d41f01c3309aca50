//! Hybrid patient/donor profile matching.
//!
//! Profiles are embedded through an [`embeddings::EmbeddingProvider`], kept in
//! a [`db::ProfileStore`] and ranked by [`services::MatchingService`], which
//! blends cosine similarity with blood type, location and age compatibility.

pub mod api;
pub mod config;
pub mod db;
pub mod embeddings;
pub mod error;
pub mod llm;
pub mod matching;
pub mod models;
pub mod services;
