//! Podium: content service for a conference website.
//!
//! Owns the home-page content model (event metadata, ordered content
//! blocks, time-windowed banners) and resolves keynote/speaker lists
//! from the pretalx API behind a process-wide TTL cache.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
