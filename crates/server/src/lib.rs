//! StoreForge server library.
//!
//! This crate provides the storefront-builder application as a library,
//! allowing it to be tested and reused (the CLI drives migrations and
//! seeding through it).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
