// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod config;
pub mod db;
pub mod export;
pub mod llm;
pub mod projections;
pub mod roster;
pub mod scoring;
pub mod trade;
