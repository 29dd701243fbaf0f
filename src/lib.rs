//! Light rig library - versioned snapshots of scene light setups.
//!
//! This library exposes the core functionality of the `lrig` CLI for use in
//! tests and in host-application bindings.
//!
//! # Modules
//!
//! - `store`: Filesystem asset/version registry and record codec
//! - `scene`: Scene abstraction layer, type rules and the in-memory scene
//! - `rig`: Collecting lights from a scene and applying records to one
//! - `session`: Publish/load workflows over one store
//! - `config`: Base directory and store root resolution
//! - `error`: Error types with user-recoverable hints
//! - `output`: Output mode abstraction (robot/human)
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod rig;
pub mod scene;
pub mod session;
pub mod store;
pub mod theme;
