//! segedit core - segment model and persistence for a media-center segment editor
//!
//! This crate contains all business logic with zero UI dependencies.
//! A host player UI drives [`session::EditSession`]; a CLI tool can use the
//! loaders and writers directly.
//!
//! - [`segments`] - the segment entity, timecodes, labels, overlap classification
//! - [`formats`] - EDL and chapter XML readers/writers, save policy
//! - [`vfs`] - filesystem abstraction and verified NFS-aware writes
//! - [`session`] - in-memory editing of one video's segments
//! - [`config`] / [`logging`] - ambient setup

pub mod config;
pub mod formats;
pub mod logging;
pub mod segments;
pub mod session;
pub mod vfs;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
