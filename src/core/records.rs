//! Genome records
//!
//! A genome is an ordered list of `(name, sequence)` records. Two genomes
//! handed to the mapper correspond record-by-record, so a record source must
//! preserve file order.

use crate::core::error::RecordError;
use crate::core::io::open_input;
use bio::io::fasta;
use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// One named sequence (chromosome, segment, contig)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromRecord {
    pub name: String,
    pub seq: Vec<u8>,
}

impl ChromRecord {
    pub fn new(name: impl Into<String>, seq: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            seq: seq.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// Supplies the ordered records of a genome by identifier
pub trait RecordSource {
    fn records(&self, genome: &str) -> Result<Vec<ChromRecord>, RecordError>;
}

impl RecordSource for HashMap<String, Vec<ChromRecord>> {
    fn records(&self, genome: &str) -> Result<Vec<ChromRecord>, RecordError> {
        self.get(genome)
            .cloned()
            .ok_or_else(|| RecordError::UnknownGenome(genome.to_string()))
    }
}

/// Genomes stored as FASTA files, one file per genome
///
/// Files may be gzip or bzip2 compressed.
#[derive(Debug, Clone, Default)]
pub struct FastaFiles {
    paths: HashMap<String, PathBuf>,
}

impl FastaFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` under `genome`
    pub fn insert(&mut self, genome: impl Into<String>, path: impl Into<PathBuf>) {
        self.paths.insert(genome.into(), path.into());
    }

    /// Use each path as its own genome identifier
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut files = Self::new();
        for path in paths {
            let path = path.as_ref();
            files.insert(path.to_string_lossy(), path);
        }
        files
    }
}

impl RecordSource for FastaFiles {
    fn records(&self, genome: &str) -> Result<Vec<ChromRecord>, RecordError> {
        let path = self
            .paths
            .get(genome)
            .ok_or_else(|| RecordError::UnknownGenome(genome.to_string()))?;
        read_fasta(path)
    }
}

/// Read all records of a FASTA file, in file order
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<ChromRecord>, RecordError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RecordError::FileNotFound(path.to_path_buf()));
    }
    let records = parse_fasta_reader(open_input(path)?)?;
    log::debug!("Read {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Parse FASTA from bytes
pub fn parse_fasta_bytes(data: &[u8]) -> Result<Vec<ChromRecord>, RecordError> {
    parse_fasta_reader(data)
}

/// Parse FASTA from any reader
///
/// The record name is the header up to the first whitespace. Sequence
/// lines are concatenated; gap symbols are kept as-is.
pub fn parse_fasta_reader<R: Read>(reader: R) -> Result<Vec<ChromRecord>, RecordError> {
    let mut records = Vec::new();

    for (i, result) in fasta::Reader::new(reader).records().enumerate() {
        let number = i + 1;
        let record = result.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData | io::ErrorKind::Other => RecordError::Malformed {
                record: number,
                message: e.to_string(),
            },
            _ => RecordError::Io(e),
        })?;

        if record.id().is_empty() {
            return Err(RecordError::Malformed {
                record: number,
                message: "empty record name".to_string(),
            });
        }
        if record.seq().is_empty() {
            log::warn!("FASTA record '{}' has no sequence", record.id());
        }
        records.push(ChromRecord::new(record.id(), record.seq()));
    }

    Ok(records)
}

/// Write one record as FASTA, sequence on a single line
pub fn write_fasta_record<W: Write>(writer: &mut W, name: &str, seq: &[u8]) -> io::Result<()> {
    let mut fasta_writer = fasta::Writer::new(writer);
    fasta_writer.write(name, None, seq)?;
    fasta_writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_fasta_bytes() {
        let data = b">chr1 first chromosome\nACGT\nAC-T\n\n>chr2\tsecond\r\nGG\n";
        let records = parse_fasta_bytes(data).unwrap();
        assert_eq!(
            records,
            vec![
                ChromRecord::new("chr1", "ACGTAC-T"),
                ChromRecord::new("chr2", "GG"),
            ]
        );
    }

    #[test]
    fn test_parse_fasta_keeps_order() {
        let data = b">z\nA\n>a\nC\n>m\nG\n";
        let names: Vec<String> = parse_fasta_bytes(data)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parse_fasta_rejects_orphan_sequence() {
        let err = parse_fasta_bytes(b"ACGT\n>chr1\nAC\n").unwrap_err();
        assert!(matches!(err, RecordError::Malformed { record: 1, .. }));
    }

    #[test]
    fn test_parse_fasta_rejects_empty_name() {
        let err = parse_fasta_bytes(b">chr1\nAC\n>\nACGT\n").unwrap_err();
        assert!(matches!(err, RecordError::Malformed { record: 2, .. }));
    }

    #[test]
    fn test_parse_fasta_empty_record_kept() {
        let records = parse_fasta_bytes(b">chr1\n>chr2\nGT\n").unwrap();
        assert_eq!(
            records,
            vec![ChromRecord::new("chr1", ""), ChromRecord::new("chr2", "GT")]
        );
    }

    #[test]
    fn test_write_fasta_record() {
        let mut out = Vec::new();
        write_fasta_record(&mut out, "chr1", b"AC-GT").unwrap();
        write_fasta_record(&mut out, "chr2", b"TT").unwrap();
        assert_eq!(out, b">chr1\nAC-GT\n>chr2\nTT\n".to_vec());
        assert_eq!(
            parse_fasta_bytes(&out).unwrap(),
            vec![ChromRecord::new("chr1", "AC-GT"), ChromRecord::new("chr2", "TT")]
        );
    }

    #[test]
    fn test_read_fasta_gzip() -> Result<(), RecordError> {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">chr1 desc\nAC-G\nT\n")?;
        let mut gz = tempfile::Builder::new().suffix(".fa.gz").tempfile()?;
        gz.write_all(&encoder.finish()?)?;
        gz.flush()?;

        assert_eq!(read_fasta(gz.path())?, vec![ChromRecord::new("chr1", "AC-GT")]);
        Ok(())
    }

    #[test]
    fn test_fasta_files_source() -> Result<(), RecordError> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b">seg1\nACGT\n>seg2\nTT\n")?;
        file.flush()?;

        let mut source = FastaFiles::new();
        source.insert("genomeA", file.path());
        let records = source.records("genomeA")?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], ChromRecord::new("seg2", "TT"));

        assert!(matches!(
            source.records("genomeB"),
            Err(RecordError::UnknownGenome(_))
        ));
        Ok(())
    }

    #[test]
    fn test_fasta_files_from_paths() -> Result<(), RecordError> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b">chr1\nAC-GT\n")?;
        file.flush()?;

        let source = FastaFiles::from_paths([file.path()]);
        let key = file.path().to_string_lossy();
        assert_eq!(source.records(&key)?, vec![ChromRecord::new("chr1", "AC-GT")]);
        Ok(())
    }

    #[test]
    fn test_read_fasta_missing_file() {
        let err = read_fasta("/nonexistent/genome.fa").unwrap_err();
        assert!(matches!(err, RecordError::FileNotFound(_)));
    }

    #[test]
    fn test_in_memory_source() {
        let mut source: HashMap<String, Vec<ChromRecord>> = HashMap::new();
        source.insert("ref".to_string(), vec![ChromRecord::new("chr1", "ACGT")]);
        assert_eq!(source.records("ref").unwrap().len(), 1);
        assert!(source.records("alt").is_err());
    }
}
