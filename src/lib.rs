//! lsfgctl library - Configuration and profile management for the lsfg-vk
//! frame generation Vulkan layer.
//!
//! This library exposes the core functionality of the `lsfgctl` CLI for use
//! in tests and potentially other applications.
//!
//! # Modules
//!
//! - `schema`: Typed field schema shared by every codec
//! - `codec`: TOML-subset and launch-script serialization
//! - `profile`: Profile set with merge/mutation rules
//! - `service`: Load→mutate→persist configuration operations
//! - `detect`: Lossless.dll path detection boundary
//! - `error`: Error types with user-recoverable hints
#![forbid(unsafe_code)]

pub mod cli;
pub mod codec;
pub mod detect;
pub mod error;
pub mod logging;
pub mod profile;
pub mod schema;
pub mod service;
