use clap::Parser;
use std::path::PathBuf;

use crate::config::Profile;

#[derive(Parser, Debug)]
#[command(
    name = "seedkit",
    version,
    about = "A CLI utility to create BitTorrent metainfo files, one at a time or in batches",
    author = "seedkit contributors"
)]
pub struct Args {
    /// The file or directory to create a torrent from
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Announce URL(s) - one tier each; comma-separate backup URLs in a tier
    #[arg(short = 'a', long = "announce", value_name = "URL")]
    pub announce: Vec<String>,

    /// Web seed URL(s) - can be specified multiple times
    #[arg(short = 'w', long = "web-seed", value_name = "URL", value_delimiter = ',')]
    pub web_seed: Vec<String>,

    /// Add a comment to the metainfo
    #[arg(short = 'c', long = "comment", value_name = "COMMENT")]
    pub comment: Option<String>,

    /// Set the piece size to 2^N bytes (14-22, e.g. 18 for 256KB); omit for automatic
    #[arg(
        short = 'l',
        long = "piece-size",
        value_name = "N",
        value_parser = clap::value_parser!(u32).range(14..=22)
    )]
    pub piece_size: Option<u32>,

    /// Set the private flag
    #[arg(short = 'p', long = "private")]
    pub private: bool,

    /// Compute an MD5 digest per file
    #[arg(long = "md5")]
    pub md5: bool,

    /// Batch mode: create one torrent per immediate entry of SOURCE
    #[arg(short = 'b', long = "batch")]
    pub batch: bool,

    /// Output file (single mode) or output directory (batch mode)
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Apply defaults from a named profile in the config file
    #[arg(long = "profile", value_name = "NAME")]
    pub profile: Option<String>,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    /// Fill unset fields from a profile. Flags given on the command line win.
    pub fn apply_profile(&mut self, profile: &Profile) {
        if self.announce.is_empty() {
            if let Some(announce) = &profile.announce {
                self.announce = announce.clone();
            }
        }
        if self.web_seed.is_empty() {
            if let Some(web_seed) = &profile.web_seed {
                self.web_seed = web_seed.clone();
            }
        }
        if self.comment.is_none() {
            self.comment = profile.comment.clone();
        }
        if self.piece_size.is_none() {
            self.piece_size = profile.piece_size;
        }
        if !self.private {
            self.private = profile.private.unwrap_or(false);
        }
        if !self.md5 {
            self.md5 = profile.include_md5.unwrap_or(false);
        }
    }
}
