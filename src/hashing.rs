use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{BufReader, Read};

use crate::error::{Error, Result};
use crate::models::FileInfo;
use crate::piece::piece_count;

const READ_CHUNK: usize = 64 * 1024;

/// Piece digests plus optional per-file MD5 digests.
pub struct HashedContent {
    /// Concatenated 20-byte SHA1 piece hashes.
    pub pieces: Vec<u8>,
    /// Hex MD5 digest per file, aligned with the scanned file list.
    pub md5: Option<Vec<String>>,
}

/// Hash the global byte stream into SHA1 pieces, in order.
///
/// The callback is invoked once per completed piece with the relative path
/// of the file the piece ended in, the number of pieces done and the piece
/// total. Returning `true` from the callback stops hashing; the function
/// then returns `Ok(None)` and the partial digests are discarded.
///
/// When `include_md5` is set, a per-file MD5 digest is folded into the same
/// pass, so it adds no extra reads and no extra progress phase.
pub fn hash_pieces<F>(
    files: &[FileInfo],
    piece_size: u64,
    include_md5: bool,
    callback: &mut F,
) -> Result<Option<HashedContent>>
where
    F: FnMut(&str, u64, u64) -> bool,
{
    let total_size: u64 = files.iter().map(|f| f.len).sum();
    let total_pieces = piece_count(total_size, piece_size);

    let mut pieces = Vec::with_capacity(total_pieces as usize * 20);
    let mut digests = include_md5.then(|| Vec::with_capacity(files.len()));
    let mut sha = Sha1::new();
    let mut piece_fill: u64 = 0;
    let mut pieces_done: u64 = 0;
    let mut buf = vec![0u8; READ_CHUNK];

    for file in files {
        let label = file.path.to_string_lossy();
        let mut reader = BufReader::new(File::open(&file.full_path).map_err(|e| {
            Error::engine(format!("failed to open {}: {}", file.full_path.display(), e))
        })?);
        let mut md5 = include_md5.then(md5::Context::new);
        let mut remaining = file.len;

        while remaining > 0 {
            let want = remaining.min(READ_CHUNK as u64) as usize;
            reader.read_exact(&mut buf[..want]).map_err(|e| {
                Error::engine(format!("failed to read {}: {}", file.full_path.display(), e))
            })?;
            remaining -= want as u64;

            if let Some(ctx) = md5.as_mut() {
                ctx.consume(&buf[..want]);
            }

            let mut offset = 0usize;
            while offset < want {
                let take = ((piece_size - piece_fill) as usize).min(want - offset);
                sha.update(&buf[offset..offset + take]);
                offset += take;
                piece_fill += take as u64;

                if piece_fill == piece_size {
                    pieces.extend_from_slice(&sha.finalize_reset());
                    piece_fill = 0;
                    pieces_done += 1;
                    if callback(label.as_ref(), pieces_done, total_pieces) {
                        return Ok(None);
                    }
                }
            }
        }

        if let (Some(list), Some(ctx)) = (digests.as_mut(), md5) {
            list.push(format!("{:x}", ctx.compute()));
        }
    }

    // Trailing partial piece
    if piece_fill > 0 {
        pieces.extend_from_slice(&sha.finalize_reset());
        pieces_done += 1;
        let label = files
            .last()
            .map(|f| f.path.to_string_lossy().into_owned())
            .unwrap_or_default();
        if callback(&label, pieces_done, total_pieces) {
            return Ok(None);
        }
    }

    Ok(Some(HashedContent {
        pieces,
        md5: digests,
    }))
}
