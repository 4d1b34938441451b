use serde::Serialize;

use super::file::FileEntry;

/// Info dictionary for the torrent
#[derive(Debug, Serialize)]
pub struct Info {
    #[serde(rename = "piece length")]
    pub piece_length: u64,

    pub pieces: serde_bytes::ByteBuf,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<u8>,

    // Multi-file mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileEntry>>,

    // Single-file mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,

    // Single-file mode only; multi-file digests live on each entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5sum: Option<String>,
}

/// Torrent metainfo structure
#[derive(Debug, Serialize)]
pub struct Torrent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announce: Option<String>,

    #[serde(rename = "announce-list", skip_serializing_if = "Option::is_none")]
    pub announce_list: Option<Vec<Vec<String>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(rename = "created by")]
    pub created_by: String,

    #[serde(rename = "creation date", skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<i64>,

    pub info: Info,

    #[serde(rename = "url-list", skip_serializing_if = "Option::is_none")]
    pub url_list: Option<Vec<String>>,
}

impl Torrent {
    /// Total content size in bytes.
    pub fn total_size(&self) -> u64 {
        if let Some(length) = self.info.length {
            length
        } else if let Some(ref files) = self.info.files {
            files.iter().map(|f| f.length).sum()
        } else {
            0
        }
    }
}
