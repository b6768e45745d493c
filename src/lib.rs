// src/lib.rs

pub mod error;
pub mod storage;
pub mod auth;
pub mod catalog;
pub mod service;
pub mod api;
pub mod app_state;
pub mod config;
