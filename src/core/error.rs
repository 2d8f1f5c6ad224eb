//! Error types for genome-coordmap
//!
//! Defines all error types used throughout the library.

use crate::core::mapper::Genome;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for genome-coordmap operations
#[derive(Debug, Error)]
pub enum CoordMapError {
    /// Malformed aligned sequence pair
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Mapper construction errors
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Query-time errors
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// External aligner errors
    #[error("Aligner error: {0}")]
    Aligner(#[from] AlignerError),

    /// Genome record input errors
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An aligned pair that breaks the alignment invariants.
///
/// Columns are 0-based offsets into the aligned sequences.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("aligned sequences differ in length ({len_a} vs {len_b})")]
    LengthMismatch { len_a: usize, len_b: usize },

    #[error("gap aligned to gap at column {column}")]
    GapAlignedToGap { column: usize },

    #[error("gap in one sequence adjacent to gap in the other at column {column}")]
    AdjacentGaps { column: usize },

    #[error("sequence {genome} has no real bases")]
    NoRealBases { genome: Genome },

    #[error("no column aligns two real bases")]
    NoAlignedBases,
}

/// Errors that can occur while constructing a genome mapper
#[derive(Debug, Error)]
pub enum BuildError {
    /// A per-chromosome alignment was rejected
    #[error("chromosome {chrom}: {source}")]
    Validation {
        chrom: String,
        #[source]
        source: ValidationError,
    },

    /// Two chromosomes share a name within one genome
    #[error("duplicate chromosome name '{name}' in genome {genome}")]
    DuplicateName { genome: Genome, name: String },

    /// The two genomes do not have the same number of chromosomes
    #[error("genomes have different chromosome counts ({count_a} vs {count_b})")]
    ChromosomeCountMismatch { count_a: usize, count_b: usize },

    /// Neither genome has any chromosome
    #[error("no input sequences")]
    NoSequences,

    /// The aligner collaborator failed
    #[error("alignment of {chrom_a}/{chrom_b} failed: {source}")]
    Aligner {
        chrom_a: String,
        chrom_b: String,
        #[source]
        source: AlignerError,
    },

    /// Worker pool could not be created
    #[error("failed to create thread pool: {0}")]
    ThreadPool(String),
}

/// Errors that can occur during coordinate queries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Chromosome not present in the queried genome
    #[error("chromosome '{name}' not found in genome {genome}")]
    ChromosomeNotFound { genome: Genome, name: String },

    /// Position is not an integer coordinate
    #[error("position '{0}' is not an integer")]
    InvalidPosition(String),
}

/// Errors reported by an aligner collaborator
#[derive(Debug, Error)]
pub enum AlignerError {
    /// The aligner program could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The aligner exited unsuccessfully
    #[error("{program} exited with {status}: {stderr}")]
    NonZeroExit {
        program: String,
        status: String,
        stderr: String,
    },

    /// The aligner output could not be used
    #[error("malformed aligner output: {0}")]
    MalformedOutput(String),

    /// One of the input sequences is empty
    #[error("empty input sequence '{0}'")]
    EmptyInput(String),

    /// Temporary file handling failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while reading genome records
#[derive(Debug, Error)]
pub enum RecordError {
    /// Malformed FASTA input
    #[error("Invalid FASTA at record {record}: {message}")]
    Malformed { record: usize, message: String },

    /// The record source has no genome with this identifier
    #[error("unknown genome '{0}'")]
    UnknownGenome(String),

    /// FASTA file not found
    #[error("FASTA file not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error during reading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for genome-coordmap operations
pub type Result<T> = std::result::Result<T, CoordMapError>;

/// Result type alias for mapper construction
pub type BuildResult<T> = std::result::Result<T, BuildError>;

/// Result type alias for mapping operations
pub type MappingResult<T> = std::result::Result<T, MappingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::AdjacentGaps { column: 7 };
        assert_eq!(
            err.to_string(),
            "gap in one sequence adjacent to gap in the other at column 7"
        );
        let err = ValidationError::NoRealBases { genome: Genome::B };
        assert_eq!(err.to_string(), "sequence B has no real bases");
    }

    #[test]
    fn test_build_error_wraps_validation() {
        let err = BuildError::Validation {
            chrom: "chr2".to_string(),
            source: ValidationError::GapAlignedToGap { column: 3 },
        };
        assert_eq!(err.to_string(), "chromosome chr2: gap aligned to gap at column 3");

        let top: CoordMapError = err.into();
        assert!(matches!(top, CoordMapError::Build(BuildError::Validation { .. })));
    }

    #[test]
    fn test_mapping_error_display() {
        let err = MappingError::ChromosomeNotFound {
            genome: Genome::A,
            name: "chrZ".to_string(),
        };
        assert_eq!(err.to_string(), "chromosome 'chrZ' not found in genome A");
        assert_eq!(
            MappingError::InvalidPosition("1.5".to_string()).to_string(),
            "position '1.5' is not an integer"
        );
    }
}
