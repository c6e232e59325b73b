//! Photo storage layer.
//!
//! This module provides the storage abstraction for pictures taken by the
//! appliance. Pictures are addressed by numeric id; the store maps ids to
//! files and guarantees that only fully written pictures become visible.
//!
//! # Modules
//!
//! - `backend`: Store trait used by the controller
//! - `photos`: Directory-backed implementation with atomic commits

pub mod backend;
pub mod photos;

pub use backend::ImageStore;
pub use photos::{PhotoDirectory, PhotoWriter};
