//! `light_groups` lets an operator tag light sources in a scene with a free-text group label,
//! then view and batch-edit every light sharing a label as one unit.
//!
//! # Structure
//!
//! * [group] derives groups from the scene's lights, projects one edit state per group and
//!   turns edited states back into per-light patches.
//! * [store] describes the host collaborators (entity store, renderer) and provides an
//!   in-memory and a file-backed store.
//! * [manager] ties both together and serializes submissions per group.

#[macro_use]
extern crate tracing;

pub mod animation;
pub mod color;
pub mod config;
pub mod group;
pub mod l10n;
pub mod manager;
pub mod models;
pub mod store;
