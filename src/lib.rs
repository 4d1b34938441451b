//! # seedkit
//!
//! A library for creating BitTorrent metainfo files.
//!
//! The heavy lifting (piece hashing) runs on a background thread managed by
//! [`JobController`], which reports progress over a channel and supports
//! cooperative cancellation. Torrents can be created one at a time or in
//! batch mode, one independent torrent per immediate entry of a directory.
//!
//! ## Example
//!
//! ```no_run
//! use seedkit::{Job, JobController, JobEvent, SingleJob, TorrentDescriptor};
//! use std::path::PathBuf;
//!
//! let descriptor = TorrentDescriptor::new(PathBuf::from("my_file.txt"));
//! let mut controller = JobController::new();
//! let events = controller
//!     .start(Job::Single(SingleJob::new(descriptor, PathBuf::from("my_file.torrent"))))
//!     .unwrap();
//! for event in events {
//!     if let JobEvent::Terminal(outcome) = event {
//!         println!("{:?}", outcome);
//!         break;
//!     }
//! }
//! controller.finish();
//! ```

pub mod cli;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod hashing;
pub mod job;
pub mod models;
pub mod piece;
pub mod scanner;

// Re-export main types for convenience
pub use descriptor::TorrentDescriptor;
pub use engine::{MetainfoEngine, SourceProbe};
pub use error::{Error, Result};
pub use job::{
    BatchJob, BatchSettings, CancellationToken, Job, JobController, JobEvent, Outcome, SingleJob,
};
pub use piece::PieceSize;
