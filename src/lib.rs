// src/lib.rs

//! jobsweep: entry-level job listing extraction from paginated job boards

pub mod error;
pub mod fetch;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
