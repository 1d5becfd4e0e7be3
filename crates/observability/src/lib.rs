//! `sookari-observability` — logging/tracing bootstrap.

pub mod tracing;
