//! Relational store for the Z83 backend.
//!
//! This crate provides:
//! - Repository traits consumed by the API (accounts, jobs, applications,
//!   notifications, profiles)
//! - A PostgreSQL implementation backed by `sqlx`
//! - An in-memory implementation for tests and local runs

pub mod error;
pub mod memory;
pub mod postgres;
pub mod repos;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::{PgStore, StoreConfig};
pub use repos::{
    AccountRecord, AccountStore, ApplicationStore, JobStore, NotificationStore, ProfileStore, Store,
};
