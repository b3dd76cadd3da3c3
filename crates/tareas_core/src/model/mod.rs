//! Domain model for task records.
//!
//! # Responsibility
//! - Define the canonical task record shared by every storage backend.
//! - Own validation and the `DD/MM/YYYY` due-date codec.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - A persisted record missing optional fields always deserializes with
//!   defaults instead of failing.

pub mod task;
