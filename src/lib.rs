//! Vitrine - A personal portfolio and blog content server
//!
//! This library provides the core functionality for the Vitrine portfolio system.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
