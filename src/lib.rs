// src/lib.rs

//! Firewatch: incremental fire/rescue incident feed watcher.
//!
//! Polls a periodically-republished XLS incident report, detects rows newer
//! than a durable timestamp watermark, and forwards each new row to a
//! notification sink with per-delivery watermark persistence.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
