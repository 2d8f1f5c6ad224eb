//! Aligner collaborators
//!
//! An aligner turns two unaligned records into two gapped sequences of equal
//! length. The mapper only needs the [`Aligner`] trait; [`ExternalAligner`]
//! shells out to MUSCLE or MAFFT, and [`PreAligned`] passes sequences that
//! are already aligned straight through.

use crate::core::error::AlignerError;
use crate::core::pairwise::DEFAULT_GAP;
use crate::core::records::{parse_fasta_bytes, write_fasta_record, ChromRecord};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// Record ids written to the aligner input; output is matched back by id
const INPUT_ID_A: &str = "coordmap_seq_a";
const INPUT_ID_B: &str = "coordmap_seq_b";

/// Two aligned sequences with the names of the records they came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedPair {
    pub name_a: String,
    pub seq_a: Vec<u8>,
    pub name_b: String,
    pub seq_b: Vec<u8>,
}

impl AlignedPair {
    pub fn new(
        name_a: impl Into<String>,
        seq_a: impl Into<Vec<u8>>,
        name_b: impl Into<String>,
        seq_b: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name_a: name_a.into(),
            seq_a: seq_a.into(),
            name_b: name_b.into(),
            seq_b: seq_b.into(),
        }
    }
}

/// Pairwise aligner
///
/// Shared across worker threads during mapper construction.
pub trait Aligner: Sync {
    fn align(&self, a: &ChromRecord, b: &ChromRecord) -> Result<AlignedPair, AlignerError>;

    /// Gap symbol the aligner writes, if it decides it
    ///
    /// `None` leaves the choice to the caller's build options.
    fn gap(&self) -> Option<u8> {
        None
    }
}

fn check_not_empty(record: &ChromRecord) -> Result<(), AlignerError> {
    if record.is_empty() {
        return Err(AlignerError::EmptyInput(record.name.clone()));
    }
    Ok(())
}

/// Input that is already aligned
///
/// Sequences are passed through unchanged; alignment invariants are checked
/// when the pairwise index is built.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreAligned;

impl Aligner for PreAligned {
    fn align(&self, a: &ChromRecord, b: &ChromRecord) -> Result<AlignedPair, AlignerError> {
        check_not_empty(a)?;
        check_not_empty(b)?;
        Ok(AlignedPair::new(
            a.name.clone(),
            a.seq.clone(),
            b.name.clone(),
            b.seq.clone(),
        ))
    }
}

/// External alignment program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignerKind {
    /// `muscle -in IN -out OUT -quiet`
    #[default]
    Muscle,
    /// `mafft --auto --preservecase --quiet IN > OUT`
    Mafft,
}

impl AlignerKind {
    /// Parse from string (for CLI argument)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "muscle" => Some(AlignerKind::Muscle),
            "mafft" => Some(AlignerKind::Mafft),
            _ => None,
        }
    }

    /// Executable name looked up on PATH
    pub fn default_program(&self) -> &'static str {
        match self {
            AlignerKind::Muscle => "muscle",
            AlignerKind::Mafft => "mafft",
        }
    }
}

/// Aligner that runs MUSCLE or MAFFT out of process
///
/// No timeout is enforced. Gaps in the output are always `-`, whatever
/// gap symbol the build options name.
#[derive(Debug, Clone)]
pub struct ExternalAligner {
    kind: AlignerKind,
    program: PathBuf,
}

impl ExternalAligner {
    pub fn new(kind: AlignerKind) -> Self {
        Self {
            kind,
            program: PathBuf::from(kind.default_program()),
        }
    }

    /// Use a specific executable instead of the one on PATH
    pub fn with_program(kind: AlignerKind, program: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            program: program.into(),
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    /// Run the program and return the aligned FASTA it produced
    fn run(&self, input: &std::path::Path) -> Result<Vec<u8>, AlignerError> {
        let mut command = Command::new(&self.program);
        let output_file = match self.kind {
            AlignerKind::Muscle => {
                let output_file = tempfile::Builder::new().suffix(".fasta").tempfile()?;
                command
                    .arg("-in")
                    .arg(input)
                    .arg("-out")
                    .arg(output_file.path())
                    .arg("-quiet");
                Some(output_file)
            }
            AlignerKind::Mafft => {
                command
                    .args(["--auto", "--preservecase", "--quiet"])
                    .arg(input);
                None
            }
        };

        log::debug!("Running {:?}", command);
        let output = command.output().map_err(|source| AlignerError::Spawn {
            program: self.program_name(),
            source,
        })?;

        if !output.status.success() {
            return Err(AlignerError::NonZeroExit {
                program: self.program_name(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        match output_file {
            Some(file) => Ok(std::fs::read(file.path())?),
            None => Ok(output.stdout),
        }
    }
}

impl Aligner for ExternalAligner {
    fn align(&self, a: &ChromRecord, b: &ChromRecord) -> Result<AlignedPair, AlignerError> {
        check_not_empty(a)?;
        check_not_empty(b)?;

        let mut input = tempfile::Builder::new().suffix(".fasta").tempfile()?;
        write_fasta_record(&mut input, INPUT_ID_A, &a.seq)?;
        write_fasta_record(&mut input, INPUT_ID_B, &b.seq)?;
        input.flush()?;

        let aligned = self.run(input.path())?;
        pair_from_output(a, b, &aligned)
    }

    fn gap(&self) -> Option<u8> {
        Some(DEFAULT_GAP)
    }
}

/// Pick the two input records back out of aligned FASTA output
///
/// Aligners may reorder records, so they are located by the ids written to the input.
fn pair_from_output(
    a: &ChromRecord,
    b: &ChromRecord,
    aligned: &[u8],
) -> Result<AlignedPair, AlignerError> {
    let mut records =
        parse_fasta_bytes(aligned).map_err(|e| AlignerError::MalformedOutput(e.to_string()))?;

    let mut take = |id: &str| -> Result<Vec<u8>, AlignerError> {
        let pos = records
            .iter()
            .position(|r| r.name == id)
            .ok_or_else(|| AlignerError::MalformedOutput(format!("record {} missing", id)))?;
        Ok(records.swap_remove(pos).seq)
    };
    let seq_a = take(INPUT_ID_A)?;
    let seq_b = take(INPUT_ID_B)?;

    if seq_a.len() != seq_b.len() {
        return Err(AlignerError::MalformedOutput(format!(
            "aligned lengths differ ({} vs {})",
            seq_a.len(),
            seq_b.len()
        )));
    }

    Ok(AlignedPair::new(a.name.clone(), seq_a, b.name.clone(), seq_b))
}
