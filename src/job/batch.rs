use std::path::PathBuf;

use super::{CancellationToken, Outcome, write_metainfo};
use crate::descriptor::TorrentDescriptor;
use crate::engine::{MetainfoEngine, creator_tag};
use crate::error::Error;

/// Fields shared by every torrent in a batch run.
///
/// Piece size is absent on purpose: batch entries always use the engine's
/// automatic policy, since there is no per-entry selection step.
#[derive(Debug, Clone, Default)]
pub struct BatchSettings {
    pub private: bool,
    pub include_md5: bool,
    pub comment: Option<String>,
    pub trackers: Vec<String>,
    pub web_seeds: Vec<String>,
}

impl BatchSettings {
    fn descriptor_for(&self, source: PathBuf) -> TorrentDescriptor {
        TorrentDescriptor {
            source,
            piece_size: None,
            private: self.private,
            include_md5: self.include_md5,
            comment: self.comment.clone(),
            trackers: self.trackers.clone(),
            web_seeds: self.web_seeds.clone(),
        }
    }
}

/// Generates one independent torrent per immediate entry of a directory.
#[derive(Debug)]
pub struct BatchJob {
    source: PathBuf,
    output_dir: PathBuf,
    settings: BatchSettings,
}

impl BatchJob {
    pub fn new(source: PathBuf, output_dir: PathBuf, settings: BatchSettings) -> Self {
        Self {
            source,
            output_dir,
            settings,
        }
    }

    /// Snapshot the immediate children once, sorted by name.
    ///
    /// Entries appearing after this pass are not picked up.
    fn snapshot(&self) -> Result<Vec<(String, PathBuf)>, Error> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.source)
            .map_err(|e| Error::invalid_input(format!("{}: {}", self.source.display(), e)))?
        {
            let entry = entry
                .map_err(|e| Error::invalid_input(format!("{}: {}", self.source.display(), e)))?;
            entries.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    /// Process every entry in order.
    ///
    /// For entry i of N the event `(<name>.torrent, i, N)` is emitted
    /// before hashing starts; per-entry piece progress is not surfaced.
    /// The token is checked before each entry, so cancellation stops ahead
    /// and leaves previously written torrents on disk. Any entry failure
    /// other than cancellation aborts the whole batch.
    pub fn run(
        &self,
        token: &CancellationToken,
        progress: &mut dyn FnMut(&str, u64, u64),
    ) -> Outcome {
        let entries = match self.snapshot() {
            Ok(entries) => entries,
            Err(e) => return Outcome::Failed(e),
        };
        let total = entries.len() as u64;

        for (i, (name, path)) in entries.iter().enumerate() {
            let torrent_name = format!("{}.torrent", name);
            progress(&torrent_name, i as u64, total);

            if token.is_cancelled() {
                return Outcome::Cancelled;
            }

            let descriptor = self.settings.descriptor_for(path.clone());
            let mut engine = MetainfoEngine::new(descriptor)
                .stamped(chrono::Utc::now().timestamp(), creator_tag());

            match engine.generate(|_, _, _| token.is_cancelled()) {
                Err(e) => return Outcome::Failed(e),
                Ok(false) => return Outcome::Cancelled,
                Ok(true) => {}
            }

            if let Err(e) = write_metainfo(&engine, &self.output_dir.join(&torrent_name)) {
                return Outcome::Failed(e);
            }
        }

        Outcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn seed_entries(dir: &Path, names: &[&str]) -> PathBuf {
        let source = dir.join("drop");
        fs::create_dir(&source).unwrap();
        for name in names {
            fs::write(source.join(name), format!("payload of {}", name)).unwrap();
        }
        source
    }

    fn torrent_count(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter(|e| {
                e.as_ref().unwrap().path().extension().and_then(|x| x.to_str()) == Some("torrent")
            })
            .count()
    }

    #[test]
    fn test_one_event_and_artifact_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let source = seed_entries(dir.path(), &["a.bin", "b.bin", "c.bin"]);
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        let job = BatchJob::new(source, out.clone(), BatchSettings::default());
        let mut events = Vec::new();
        let outcome = job.run(&CancellationToken::new(), &mut |label, done, total| {
            events.push((label.to_string(), done, total));
        });

        assert!(matches!(outcome, Outcome::Completed));
        assert_eq!(events, vec![
            ("a.bin.torrent".to_string(), 0, 3),
            ("b.bin.torrent".to_string(), 1, 3),
            ("c.bin.torrent".to_string(), 2, 3),
        ]);
        assert_eq!(torrent_count(&out), 3);
        assert!(out.join("a.bin.torrent").exists());
        assert!(out.join("c.bin.torrent").exists());
    }

    #[test]
    fn test_cancel_stops_ahead_and_keeps_finished_entries() {
        let dir = tempfile::tempdir().unwrap();
        let source = seed_entries(dir.path(), &["a.bin", "b.bin", "c.bin"]);
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        let token = CancellationToken::new();
        let observer_token = token.clone();
        let job = BatchJob::new(source, out.clone(), BatchSettings::default());

        // The observer runs on the job's thread right before the entry's
        // token check, so cancelling at the third event is deterministic.
        let mut events = Vec::new();
        let outcome = job.run(&token, &mut |label, done, total| {
            if done == 2 {
                observer_token.cancel();
            }
            events.push((label.to_string(), done, total));
        });

        assert!(matches!(outcome, Outcome::Cancelled));
        assert_eq!(events.len(), 3);
        assert_eq!(torrent_count(&out), 2);
        assert!(out.join("a.bin.torrent").exists());
        assert!(out.join("b.bin.torrent").exists());
        assert!(!out.join("c.bin.torrent").exists());
    }

    #[test]
    fn test_cancel_before_start_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = seed_entries(dir.path(), &["a.bin", "b.bin"]);
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let job = BatchJob::new(source, out.clone(), BatchSettings::default());
        let outcome = job.run(&token, &mut |_, _, _| {});

        assert!(matches!(outcome, Outcome::Cancelled));
        assert_eq!(torrent_count(&out), 0);
    }

    #[test]
    fn test_empty_directory_completes_with_no_events() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("drop");
        fs::create_dir(&source).unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        let job = BatchJob::new(source, out.clone(), BatchSettings::default());
        let mut events = 0;
        let outcome = job.run(&CancellationToken::new(), &mut |_, _, _| events += 1);

        assert!(matches!(outcome, Outcome::Completed));
        assert_eq!(events, 0);
        assert_eq!(torrent_count(&out), 0);
    }

    #[test]
    fn test_entry_failure_aborts_whole_batch() {
        let dir = tempfile::tempdir().unwrap();
        let source = seed_entries(dir.path(), &["a.bin"]);
        // An empty entry fails the engine probe, which is fatal to the batch
        fs::write(source.join("b.empty"), b"").unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        let job = BatchJob::new(source, out.clone(), BatchSettings::default());
        let outcome = job.run(&CancellationToken::new(), &mut |_, _, _| {});

        assert!(matches!(outcome, Outcome::Failed(_)));
        // The entry before the failure stays on disk
        assert!(out.join("a.bin.torrent").exists());
        assert!(!out.join("b.empty.torrent").exists());
    }

    #[test]
    fn test_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let job = BatchJob::new(
            dir.path().join("nowhere"),
            dir.path().to_path_buf(),
            BatchSettings::default(),
        );
        let outcome = job.run(&CancellationToken::new(), &mut |_, _, _| {});
        assert!(matches!(
            outcome,
            Outcome::Failed(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_settings_are_copied_into_each_entry() {
        let dir = tempfile::tempdir().unwrap();
        let source = seed_entries(dir.path(), &["a.bin"]);
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        let settings = BatchSettings {
            private: true,
            include_md5: true,
            comment: Some("batch comment".into()),
            trackers: vec!["http://t.example/announce".into()],
            web_seeds: vec![],
        };
        let job = BatchJob::new(source, out.clone(), settings);
        let outcome = job.run(&CancellationToken::new(), &mut |_, _, _| {});
        assert!(matches!(outcome, Outcome::Completed));

        let raw = fs::read(out.join("a.bin.torrent")).unwrap();
        let text = String::from_utf8_lossy(&raw);
        assert!(text.contains("7:privatei1e"));
        assert!(text.contains("13:batch comment"));
        assert!(text.contains("t.example/announce"));
        assert!(text.contains("6:md5sum"));
    }
}
