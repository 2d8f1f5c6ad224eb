//! Core coordinate mapping functionality
//!
//! This module contains the pairwise breakpoint index, the genome-level
//! mapper, and the aligner and record-source collaborators they use.

mod aligner;
mod error;
pub mod io;
mod mapper;
mod pairwise;
mod records;

pub use aligner::{AlignedPair, Aligner, AlignerKind, ExternalAligner, PreAligned};
pub use error::{
    AlignerError, BuildError, BuildResult, CoordMapError, MappingError, MappingResult,
    RecordError, Result, ValidationError,
};
pub use io::{detect_compression, open_input, CompressionFormat};
pub use mapper::{BuildOptions, ChromLink, Genome, GenomeCoordinateMapper};
pub use pairwise::{Direction, MappedPos, PairwiseCoordinateIndex, Side, DEFAULT_GAP};
pub use records::{
    parse_fasta_bytes, parse_fasta_reader, read_fasta, write_fasta_record, ChromRecord,
    FastaFiles, RecordSource,
};

/// Parse a 1-based position given as text
///
/// # Examples
/// ```
/// use genome_coordmap::core::{parse_position, MappingError};
/// assert_eq!(parse_position("42"), Ok(42));
/// assert_eq!(parse_position(" 7 "), Ok(7));
/// assert!(matches!(parse_position("4.5"), Err(MappingError::InvalidPosition(_))));
/// ```
pub fn parse_position(text: &str) -> MappingResult<u64> {
    let trimmed = text.trim();
    trimmed
        .parse::<u64>()
        .map_err(|_| MappingError::InvalidPosition(trimmed.to_string()))
}
