//! # gazette-store
//!
//! SQLite persistence for the Gazette blogging platform.
//!
//! The crate exposes a synchronous `Database` handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for every domain
//! model: users, groups, posts, comments, follow edges and logout records.
//! Schema migrations run automatically on open.

pub mod comments;
pub mod database;
pub mod follows;
pub mod groups;
pub mod logout;
pub mod migrations;
pub mod models;
pub mod pagination;
pub mod posts;
pub mod users;

mod col;
mod error;

pub use database::Database;
pub use error::StoreError;
pub use models::*;
pub use pagination::{Page, PageSpec, PAGE_SIZE};
