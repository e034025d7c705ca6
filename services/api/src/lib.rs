//! Movie catalog service
//!
//! REST API over a relational store: user accounts with JWT sessions gating
//! per-user movie/TV-show collections.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;
