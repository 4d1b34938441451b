use serde_bytes::ByteBuf;
use std::io::Write;
use std::path::PathBuf;

use crate::descriptor::TorrentDescriptor;
use crate::error::{Error, Result};
use crate::hashing::{HashedContent, hash_pieces};
use crate::models::{FileEntry, FileInfo, Info, Torrent};
use crate::piece::{PieceSize, piece_count};
use crate::scanner::scan_files;

/// Creator tag stamped into the `created by` field.
pub fn creator_tag() -> String {
    format!("seedkit {}", env!("CARGO_PKG_VERSION"))
}

/// Result of probing a source path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceProbe {
    pub total_bytes: u64,
    pub file_count: usize,
    pub piece_size: PieceSize,
    pub piece_count: u64,
}

impl SourceProbe {
    /// Recompute the derived piece count for a different piece size.
    ///
    /// Piece count is a pure function of total size and piece size, so no
    /// filesystem access happens here.
    pub fn with_piece_size(&self, piece_size: PieceSize) -> SourceProbe {
        SourceProbe {
            piece_size,
            piece_count: piece_count(self.total_bytes, piece_size.bytes()),
            ..*self
        }
    }
}

/// Hashes content and assembles the metainfo for one descriptor.
///
/// Call order is `probe` (optional), `generate`, then `serialize`. The scan
/// is memoized, so generating after a probe does not rescan the filesystem.
pub struct MetainfoEngine {
    descriptor: TorrentDescriptor,
    output_file: Option<PathBuf>,
    creation_date: Option<i64>,
    created_by: String,
    scanned: Option<(Vec<FileInfo>, u64)>,
    metainfo: Option<Torrent>,
}

impl MetainfoEngine {
    pub fn new(descriptor: TorrentDescriptor) -> Self {
        Self {
            descriptor,
            output_file: None,
            creation_date: None,
            created_by: creator_tag(),
            scanned: None,
            metainfo: None,
        }
    }

    /// Exclude the output artifact from scanning when it sits inside the source.
    pub fn with_output_file(mut self, output: PathBuf) -> Self {
        self.output_file = Some(output);
        self
    }

    /// Stamp the creation timestamp and creator tag.
    ///
    /// Jobs call this at the moment execution begins, so the recorded time
    /// reflects actual creation, not descriptor construction.
    pub fn stamped(mut self, creation_date: i64, created_by: impl Into<String>) -> Self {
        self.creation_date = Some(creation_date);
        self.created_by = created_by.into();
        self
    }

    fn ensure_scanned(&mut self) -> Result<&(Vec<FileInfo>, u64)> {
        if self.scanned.is_none() {
            let scanned = scan_files(&self.descriptor.source, self.output_file.as_deref())?;
            if scanned.1 == 0 {
                return Err(Error::invalid_input(format!(
                    "{}: no content to hash",
                    self.descriptor.source.display()
                )));
            }
            self.scanned = Some(scanned);
        }
        self.scanned
            .as_ref()
            .ok_or_else(|| Error::engine("source not scanned"))
    }

    /// Probe the source: scan it and report size, file count, the effective
    /// piece size and the derived piece count.
    pub fn probe(&mut self) -> Result<SourceProbe> {
        let selected = self.descriptor.piece_size;
        let (file_count, total_bytes) = {
            let (files, total) = self.ensure_scanned()?;
            (files.len(), *total)
        };
        let piece_size = selected.unwrap_or_else(|| PieceSize::auto(total_bytes));
        Ok(SourceProbe {
            total_bytes,
            file_count,
            piece_size,
            piece_count: piece_count(total_bytes, piece_size.bytes()),
        })
    }

    /// Hash the content and build the metainfo.
    ///
    /// The callback is invoked once per completed piece; returning `true`
    /// stops hashing promptly, in which case `Ok(false)` is returned and no
    /// metainfo is retained.
    pub fn generate<F>(&mut self, mut callback: F) -> Result<bool>
    where
        F: FnMut(&str, u64, u64) -> bool,
    {
        self.ensure_scanned()?;
        let descriptor = self.descriptor.clone();
        let (files, total) = match &self.scanned {
            Some((files, total)) => (&files[..], *total),
            None => return Err(Error::engine("source not scanned")),
        };
        let piece_size = descriptor
            .piece_size
            .unwrap_or_else(|| PieceSize::auto(total));

        let hashed = match hash_pieces(
            files,
            piece_size.bytes(),
            descriptor.include_md5,
            &mut callback,
        )? {
            Some(hashed) => hashed,
            None => return Ok(false),
        };

        let metainfo = build_metainfo(
            &descriptor,
            files,
            total,
            piece_size,
            hashed,
            self.creation_date,
            &self.created_by,
        );
        self.metainfo = Some(metainfo);
        Ok(true)
    }

    /// Bencode the metainfo into the sink. Only valid after a successful
    /// `generate`.
    pub fn serialize<W: Write>(&self, sink: &mut W) -> Result<()> {
        let metainfo = self
            .metainfo
            .as_ref()
            .ok_or_else(|| Error::engine("no metainfo generated yet"))?;
        let data = serde_bencode::to_bytes(metainfo)?;
        sink.write_all(&data)?;
        sink.flush()?;
        Ok(())
    }

    pub fn metainfo(&self) -> Option<&Torrent> {
        self.metainfo.as_ref()
    }
}

fn build_metainfo(
    descriptor: &TorrentDescriptor,
    files: &[FileInfo],
    total_size: u64,
    piece_size: PieceSize,
    hashed: HashedContent,
    creation_date: Option<i64>,
    created_by: &str,
) -> Torrent {
    let name = descriptor
        .source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());

    let is_single_file = descriptor.source.is_file();

    let (files_section, length_section, md5_single) = if is_single_file {
        let md5sum = hashed.md5.and_then(|mut digests| digests.pop());
        (None, Some(total_size), md5sum)
    } else {
        let mut digests = hashed.md5.map(|d| d.into_iter());
        let entries: Vec<FileEntry> = files
            .iter()
            .map(|f| FileEntry {
                length: f.len,
                path: f
                    .path
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string())
                    .collect(),
                md5sum: digests.as_mut().and_then(|d| d.next()),
            })
            .collect();
        (Some(entries), None, None)
    };

    let (announce, announce_list) = build_announce(&descriptor.trackers);

    Torrent {
        announce,
        announce_list,
        comment: descriptor.comment.clone(),
        created_by: created_by.to_string(),
        creation_date,
        info: Info {
            piece_length: piece_size.bytes(),
            pieces: ByteBuf::from(hashed.pieces),
            name,
            private: descriptor.private.then_some(1),
            files: files_section,
            length: length_section,
            md5sum: md5_single,
        },
        url_list: (!descriptor.web_seeds.is_empty()).then(|| descriptor.web_seeds.clone()),
    }
}

/// Build announce/announce-list. Each tracker entry is one tier; commas
/// split a tier into backup URLs. A lone tracker skips announce-list.
fn build_announce(trackers: &[String]) -> (Option<String>, Option<Vec<Vec<String>>>) {
    let mut list: Vec<Vec<String>> = Vec::new();
    for tier_str in trackers {
        let tier: Vec<String> = tier_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !tier.is_empty() {
            list.push(tier);
        }
    }

    if list.is_empty() {
        return (None, None);
    }

    let first = list[0][0].clone();
    if list.len() == 1 && list[0].len() == 1 {
        (Some(first), None)
    } else {
        (Some(first), Some(list))
    }
}
