//! Shared utilities and common types for Unit Manager backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT token generation and validation (RS256)
//! - Password hashing with Argon2id
//! - Cursor-based pagination
//! - Common validation logic

pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
