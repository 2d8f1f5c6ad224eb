//! Input streams for sequence files
//!
//! gzip and bzip2 input is decompressed on the fly; anything else is read
//! as plain text. Record parsing happens on top of these streams.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    Plain,
    Gzip,
    Bzip2,
}

/// Detect compression from the extension, falling back to magic bytes
///
/// gzip starts with `1f 8b`, bzip2 with `BZh`.
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("gz") => return Ok(CompressionFormat::Gzip),
        Some("bz2") => return Ok(CompressionFormat::Bzip2),
        _ => {}
    }

    let mut magic = [0u8; 3];
    let mut file = File::open(path)?;
    let n = file.read(&mut magic)?;

    Ok(if n >= 2 && magic[..2] == [0x1f, 0x8b] {
        CompressionFormat::Gzip
    } else if n >= 3 && &magic == b"BZh" {
        CompressionFormat::Bzip2
    } else {
        CompressionFormat::Plain
    })
}

/// Open a sequence file, decompressing it if needed
///
/// The stream is unbuffered; the FASTA reader adds its own buffer.
pub fn open_input(path: &Path) -> io::Result<Box<dyn Read + Send>> {
    let file = File::open(path)?;
    let format = detect_compression(path)?;
    log::debug!("Opening {} as {:?}", path.display(), format);
    Ok(match format {
        CompressionFormat::Gzip => Box::new(flate2::read::MultiGzDecoder::new(file)),
        CompressionFormat::Bzip2 => Box::new(bzip2::read::BzDecoder::new(file)),
        CompressionFormat::Plain => Box::new(file),
    })
}
