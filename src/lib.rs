//! genome-coordmap - coordinate translation between aligned genomes
//!
//! Maps 1-based positions between two genome assemblies (or two strains of
//! the same organism) once their corresponding chromosomes are aligned,
//! accounting for insertions and deletions.
//!
//! # Features
//!
//! - Sparse breakpoint index: two integers per indel, O(log n) queries
//! - Bidirectional, name-keyed lookup per chromosome pair
//! - Interval results for bases that sit directly before an indel, with
//!   left/right side selection
//! - Parallel per-chromosome alignment with rayon (MUSCLE or MAFFT)
//! - Plain, gzip and bzip2 FASTA input
//!
//! # Example
//!
//! ```ignore
//! use genome_coordmap::{AlignerKind, BuildOptions, ExternalAligner, GenomeCoordinateMapper, Side};
//! use genome_coordmap::core::read_fasta;
//!
//! let ref_a = read_fasta("strainA.fasta")?;
//! let ref_b = read_fasta("strainB.fasta")?;
//! let aligner = ExternalAligner::new(AlignerKind::Muscle);
//!
//! let mapper = GenomeCoordinateMapper::build(&ref_a, &ref_b, &aligner, BuildOptions::default())?;
//! let (chrom, pos) = mapper.map_a_to_b("chr1", 1000, Side::Left)?;
//! ```

pub mod core;

// Re-export commonly used types
pub use core::{
    AlignedPair, Aligner, AlignerError, AlignerKind, BuildError, BuildOptions, ChromRecord,
    CoordMapError, Direction, ExternalAligner, Genome, GenomeCoordinateMapper, MappedPos,
    MappingError, PairwiseCoordinateIndex, PreAligned, RecordSource, Side, ValidationError,
};
