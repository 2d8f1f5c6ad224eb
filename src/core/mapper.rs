//! Genome-level coordinate mapping
//!
//! Holds one [`PairwiseCoordinateIndex`] per corresponding chromosome pair
//! of two genomes and dispatches `(chrom, pos)` queries in either direction.
//!
//! Construction:
//! 1. Chromosomes correspond by order; names only need to be unique per genome
//! 2. Each pair is aligned by the [`Aligner`] collaborator and indexed,
//!    in parallel on a rayon pool
//! 3. The indices are merged into two name-keyed tables that share each index

use crate::core::aligner::{AlignedPair, Aligner};
use crate::core::error::{BuildError, BuildResult, CoordMapError, MappingError, MappingResult};
use crate::core::pairwise::{Direction, MappedPos, PairwiseCoordinateIndex, Side, DEFAULT_GAP};
use crate::core::records::{ChromRecord, RecordSource};
use rayon::prelude::*;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Genome tag: the first or second genome given at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genome {
    A,
    B,
}

impl Genome {
    /// Get the other genome
    ///
    /// # Examples
    /// ```
    /// use genome_coordmap::core::Genome;
    /// assert_eq!(Genome::A.other(), Genome::B);
    /// assert_eq!(Genome::B.other(), Genome::A);
    /// ```
    pub fn other(&self) -> Self {
        match self {
            Genome::A => Genome::B,
            Genome::B => Genome::A,
        }
    }
}

impl std::fmt::Display for Genome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Genome::A => write!(f, "A"),
            Genome::B => write!(f, "B"),
        }
    }
}

/// Mapper construction options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Gap symbol in aligned sequences
    pub gap: u8,
    /// Worker threads for per-chromosome alignment
    pub threads: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            threads: 1,
        }
    }
}

/// Partner chromosome and the index shared with it
#[derive(Debug, Clone)]
pub struct ChromLink {
    pub partner: String,
    pub index: Arc<PairwiseCoordinateIndex>,
}

/// Coordinate mapper between two genomes
///
/// Immutable after construction; queries need no locking.
#[derive(Debug)]
pub struct GenomeCoordinateMapper {
    a_to_b: HashMap<String, ChromLink>,
    b_to_a: HashMap<String, ChromLink>,
    /// `(chrom_a, chrom_b)` in construction order
    order: Vec<(String, String)>,
}

/// One indexed chromosome pair, before merging
struct IndexedPair {
    name_a: String,
    name_b: String,
    index: PairwiseCoordinateIndex,
}

impl GenomeCoordinateMapper {
    /// Build from two ordered record sets, aligning each chromosome pair
    ///
    /// # Example
    /// ```
    /// use genome_coordmap::core::{BuildOptions, ChromRecord, GenomeCoordinateMapper, MappedPos, PreAligned, Side};
    ///
    /// let a = vec![ChromRecord::new("chr1", "AC-GT")];
    /// let b = vec![ChromRecord::new("1", "ACTGT")];
    /// let mapper = GenomeCoordinateMapper::build(&a, &b, &PreAligned::default(), BuildOptions::default()).unwrap();
    /// assert_eq!(mapper.map_a_to_b("chr1", 4, Side::Both).unwrap(), ("1", MappedPos::Single(5)));
    /// ```
    pub fn build<A: Aligner>(
        genome_a: &[ChromRecord],
        genome_b: &[ChromRecord],
        aligner: &A,
        options: BuildOptions,
    ) -> BuildResult<Self> {
        if genome_a.len() != genome_b.len() {
            return Err(BuildError::ChromosomeCountMismatch {
                count_a: genome_a.len(),
                count_b: genome_b.len(),
            });
        }
        if genome_a.is_empty() {
            return Err(BuildError::NoSequences);
        }
        check_unique_names(genome_a, Genome::A)?;
        check_unique_names(genome_b, Genome::B)?;

        log::info!(
            "Aligning {} chromosome pair(s) with {} thread(s)",
            genome_a.len(),
            options.threads
        );

        let gap = match aligner.gap() {
            Some(symbol) => {
                if symbol != options.gap {
                    log::warn!(
                        "Aligner writes '{}' for gaps; ignoring gap symbol '{}'",
                        symbol as char,
                        options.gap as char
                    );
                }
                symbol
            }
            None => options.gap,
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .build()
            .map_err(|e| BuildError::ThreadPool(e.to_string()))?;

        let pairs: Vec<IndexedPair> = pool.install(|| {
            genome_a
                .par_iter()
                .zip(genome_b.par_iter())
                .map(|(rec_a, rec_b)| {
                    let aligned = aligner.align(rec_a, rec_b).map_err(|source| {
                        BuildError::Aligner {
                            chrom_a: rec_a.name.clone(),
                            chrom_b: rec_b.name.clone(),
                            source,
                        }
                    })?;
                    index_pair(aligned, gap)
                })
                .collect::<BuildResult<Vec<_>>>()
        })?;

        Self::merge(pairs)
    }

    /// Build from already aligned pairs, without an aligner
    pub fn from_alignments<I>(alignments: I, gap: u8) -> BuildResult<Self>
    where
        I: IntoIterator<Item = AlignedPair>,
    {
        let pairs = alignments
            .into_iter()
            .map(|aligned| index_pair(aligned, gap))
            .collect::<BuildResult<Vec<_>>>()?;
        if pairs.is_empty() {
            return Err(BuildError::NoSequences);
        }
        Self::merge(pairs)
    }

    /// Load both genomes from a record source, then build
    pub fn from_source<S, A>(
        source: &S,
        genome_a: &str,
        genome_b: &str,
        aligner: &A,
        options: BuildOptions,
    ) -> Result<Self, CoordMapError>
    where
        S: RecordSource + ?Sized,
        A: Aligner,
    {
        let records_a = source.records(genome_a)?;
        let records_b = source.records(genome_b)?;
        Ok(Self::build(&records_a, &records_b, aligner, options)?)
    }

    /// Insert every pair into both lookup tables, failing on a repeated name
    fn merge(pairs: Vec<IndexedPair>) -> BuildResult<Self> {
        let mut a_to_b = HashMap::with_capacity(pairs.len());
        let mut b_to_a = HashMap::with_capacity(pairs.len());
        let mut order = Vec::with_capacity(pairs.len());

        for pair in pairs {
            let index = Arc::new(pair.index);

            match a_to_b.entry(pair.name_a.clone()) {
                Entry::Occupied(_) => {
                    return Err(BuildError::DuplicateName {
                        genome: Genome::A,
                        name: pair.name_a,
                    })
                }
                Entry::Vacant(slot) => {
                    slot.insert(ChromLink {
                        partner: pair.name_b.clone(),
                        index: Arc::clone(&index),
                    });
                }
            }
            match b_to_a.entry(pair.name_b.clone()) {
                Entry::Occupied(_) => {
                    return Err(BuildError::DuplicateName {
                        genome: Genome::B,
                        name: pair.name_b,
                    })
                }
                Entry::Vacant(slot) => {
                    slot.insert(ChromLink {
                        partner: pair.name_a.clone(),
                        index,
                    });
                }
            }
            order.push((pair.name_a, pair.name_b));
        }

        log::info!("Built coordinate mapper for {} chromosome pair(s)", order.len());

        Ok(Self {
            a_to_b,
            b_to_a,
            order,
        })
    }

    fn table(&self, genome: Genome) -> &HashMap<String, ChromLink> {
        match genome {
            Genome::A => &self.a_to_b,
            Genome::B => &self.b_to_a,
        }
    }

    /// Look up the link for a chromosome of `genome`
    pub fn link(&self, genome: Genome, chrom: &str) -> MappingResult<&ChromLink> {
        self.table(genome)
            .get(chrom)
            .ok_or_else(|| MappingError::ChromosomeNotFound {
                genome,
                name: chrom.to_string(),
            })
    }

    /// Name of the chromosome paired with `chrom`
    pub fn partner_chrom(&self, genome: Genome, chrom: &str) -> MappingResult<&str> {
        self.link(genome, chrom).map(|link| link.partner.as_str())
    }

    /// Map `(chrom, pos)` from `genome` to the other genome
    ///
    /// With `pos == None` only the chromosome name is mapped and no position
    /// is returned. Interval results are collapsed by `side`.
    pub fn map_to_other(
        &self,
        genome: Genome,
        chrom: &str,
        pos: Option<u64>,
        side: Side,
    ) -> MappingResult<(&str, Option<MappedPos>)> {
        match pos {
            Some(pos) => self
                .map_position(genome, chrom, pos, side)
                .map(|(partner, mapped)| (partner, Some(mapped))),
            None => self.partner_chrom(genome, chrom).map(|partner| (partner, None)),
        }
    }

    fn map_position(
        &self,
        genome: Genome,
        chrom: &str,
        pos: u64,
        side: Side,
    ) -> MappingResult<(&str, MappedPos)> {
        let link = self.link(genome, chrom)?;
        let mapped = link
            .index
            .map_with_side(pos, Direction::from_genome(genome), side);
        Ok((link.partner.as_str(), mapped))
    }

    /// Map a position on a chromosome of genome A to genome B
    pub fn map_a_to_b(&self, chrom: &str, pos: u64, side: Side) -> MappingResult<(&str, MappedPos)> {
        self.map_position(Genome::A, chrom, pos, side)
    }

    /// Map a position on a chromosome of genome B to genome A
    pub fn map_b_to_a(&self, chrom: &str, pos: u64, side: Side) -> MappingResult<(&str, MappedPos)> {
        self.map_position(Genome::B, chrom, pos, side)
    }

    /// Chromosome pairs `(chrom_a, chrom_b)` in construction order
    pub fn chromosome_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Number of chromosome pairs
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn check_unique_names(records: &[ChromRecord], genome: Genome) -> BuildResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.name.as_str()) {
            return Err(BuildError::DuplicateName {
                genome,
                name: record.name.clone(),
            });
        }
    }
    Ok(())
}

fn index_pair(aligned: AlignedPair, gap: u8) -> BuildResult<IndexedPair> {
    let index = PairwiseCoordinateIndex::with_gap(&aligned.seq_a, &aligned.seq_b, gap)
        .map_err(|source| BuildError::Validation {
            chrom: aligned.name_a.clone(),
            source,
        })?;
    log::debug!(
        "{} <-> {}: {} aligned columns, {} anchors",
        aligned.name_a,
        aligned.name_b,
        aligned.seq_a.len(),
        index.len()
    );
    Ok(IndexedPair {
        name_a: aligned.name_a,
        name_b: aligned.name_b,
        index,
    })
}
