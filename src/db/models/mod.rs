// src/db/models/mod.rs

//! Data models for the application cache
//!
//! Each struct corresponds to one table and carries the queries that read
//! and write it. Search results span both tables and live in [`search`].

mod application;
mod search;
mod translation;

pub use application::{Application, Selector};
pub use search::{AppResult, SearchField, locale_candidates, search};
pub use translation::Translation;
