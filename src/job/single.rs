use std::path::PathBuf;

use super::{CancellationToken, Outcome, write_metainfo};
use crate::descriptor::TorrentDescriptor;
use crate::engine::{MetainfoEngine, creator_tag};

/// Generates one torrent from one descriptor and persists it.
#[derive(Debug)]
pub struct SingleJob {
    descriptor: TorrentDescriptor,
    output: PathBuf,
}

impl SingleJob {
    pub fn new(descriptor: TorrentDescriptor, output: PathBuf) -> Self {
        Self { descriptor, output }
    }

    /// Stamp the creation time, hash, and write the artifact.
    ///
    /// Every engine progress tick is forwarded verbatim; the adapter's
    /// return value is the token state, which makes the engine stop at the
    /// next piece once cancellation is requested. A cancelled run writes
    /// nothing.
    pub fn run(
        &self,
        token: &CancellationToken,
        progress: &mut dyn FnMut(&str, u64, u64),
    ) -> Outcome {
        let mut engine = MetainfoEngine::new(self.descriptor.clone())
            .with_output_file(self.output.clone())
            .stamped(chrono::Utc::now().timestamp(), creator_tag());

        let generated = engine.generate(|label, done, total| {
            progress(label, done, total);
            token.is_cancelled()
        });

        match generated {
            Err(e) => Outcome::Failed(e),
            Ok(false) => Outcome::Cancelled,
            Ok(true) => match write_metainfo(&engine, &self.output) {
                Ok(()) => Outcome::Completed,
                Err(e) => Outcome::Failed(e),
            },
        }
    }
}
