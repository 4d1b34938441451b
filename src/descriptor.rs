use std::path::PathBuf;

use crate::piece::PieceSize;

/// Parameters for one pending torrent.
///
/// Owned and mutated by the interactive layer only; jobs receive a copy at
/// start and treat it as read-only for the duration of the run.
#[derive(Debug, Clone)]
pub struct TorrentDescriptor {
    /// File or directory to hash.
    pub source: PathBuf,
    /// `None` selects the engine's automatic policy.
    pub piece_size: Option<PieceSize>,
    pub private: bool,
    pub include_md5: bool,
    pub comment: Option<String>,
    /// Announce URLs, one tier each, in order.
    pub trackers: Vec<String>,
    pub web_seeds: Vec<String>,
}

impl TorrentDescriptor {
    pub fn new(source: PathBuf) -> Self {
        Self {
            source,
            piece_size: None,
            private: false,
            include_md5: false,
            comment: None,
            trackers: Vec::new(),
            web_seeds: Vec::new(),
        }
    }
}
