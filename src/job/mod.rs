//! Background torrent-creation jobs.
//!
//! A [`Job`] runs on a thread spawned by [`JobController`], reports
//! progress through a channel of [`JobEvent`]s and honors a
//! [`CancellationToken`]. Exactly one job can be active at a time.

mod batch;
mod controller;
mod signal;
mod single;

pub use batch::{BatchJob, BatchSettings};
pub use controller::{JobController, JobEvent};
pub use signal::CancellationToken;
pub use single::SingleJob;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::engine::MetainfoEngine;
use crate::error::{Error, Result};

/// How a job ended. Delivered exactly once, as the final event.
#[derive(Debug)]
pub enum Outcome {
    Completed,
    Cancelled,
    Failed(Error),
}

/// A unit of work the controller can run.
#[derive(Debug)]
pub enum Job {
    Single(SingleJob),
    Batch(BatchJob),
}

impl Job {
    /// Run to completion on the current thread.
    ///
    /// Progress callbacks fire on the calling thread; the controller wraps
    /// this in a channel sender, tests may pass a recording closure.
    pub fn run(
        &self,
        token: &CancellationToken,
        progress: &mut dyn FnMut(&str, u64, u64),
    ) -> Outcome {
        match self {
            Job::Single(job) => job.run(token, progress),
            Job::Batch(job) => job.run(token, progress),
        }
    }
}

/// Write the generated metainfo to `path` in one scoped pass.
///
/// The buffer is flushed explicitly; if anything fails the artifact is
/// removed so a torn file is never left behind looking valid.
pub(crate) fn write_metainfo(engine: &MetainfoEngine, path: &Path) -> Result<()> {
    let write = |path: &Path| -> Result<()> {
        let file = File::create(path)?;
        let mut sink = BufWriter::new(file);
        engine.serialize(&mut sink)?;
        sink.flush()?;
        Ok(())
    };

    write(path).inspect_err(|_| {
        let _ = std::fs::remove_file(path);
    })
}
