//! coordmap CLI entry point
//!
//! Maps positions between two genomes whose chromosomes correspond by order.

use clap::{Parser, Subcommand, ValueEnum};
use genome_coordmap::core::{
    parse_position, AlignerKind, BuildOptions, ExternalAligner, FastaFiles, Genome,
    GenomeCoordinateMapper, PreAligned, Side, DEFAULT_GAP,
};
use genome_coordmap::Direction;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum AlignerArg {
    /// Input FASTA files are already aligned
    #[default]
    #[value(name = "none")]
    None,
    /// Align each chromosome pair with MUSCLE
    #[value(name = "muscle")]
    Muscle,
    /// Align each chromosome pair with MAFFT
    #[value(name = "mafft")]
    Mafft,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum SideArg {
    /// Left-most position of an interval
    #[value(name = "left")]
    Left,
    /// Report intervals as left-right
    #[default]
    #[value(name = "both")]
    Both,
    /// Right-most position of an interval
    #[value(name = "right")]
    Right,
}

impl From<SideArg> for Side {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::Left => Side::Left,
            SideArg::Both => Side::Both,
            SideArg::Right => Side::Right,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum GenomeArg {
    #[default]
    #[value(name = "a")]
    A,
    #[value(name = "b")]
    B,
}

impl From<GenomeArg> for Genome {
    fn from(arg: GenomeArg) -> Self {
        match arg {
            GenomeArg::A => Genome::A,
            GenomeArg::B => Genome::B,
        }
    }
}

/// Options shared by every subcommand that builds a mapper
#[derive(clap::Args)]
struct GenomeArgs {
    /// FASTA file of genome A
    genome_a: PathBuf,
    /// FASTA file of genome B (same chromosome count and order as genome A)
    genome_b: PathBuf,
    /// Aligner for each chromosome pair
    #[arg(short = 'a', long, default_value = "none")]
    aligner: AlignerArg,
    /// Path to the aligner executable (default: looked up on PATH)
    #[arg(long = "aligner-path")]
    aligner_path: Option<PathBuf>,
    /// Gap symbol in aligned sequences
    #[arg(long, default_value_t = DEFAULT_GAP as char)]
    gap: char,
    /// Number of threads for per-chromosome alignment
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,
}

#[derive(Parser)]
#[command(name = "coordmap")]
#[command(about = "Map coordinates between two aligned genomes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map CHROM:POS queries to the other genome
    Map {
        #[command(flatten)]
        genomes: GenomeArgs,
        /// Query as CHROM:POS (repeatable), or CHROM alone for the partner name
        #[arg(short = 'q', long = "query", required = true)]
        queries: Vec<String>,
        /// Genome the queries refer to
        #[arg(long, default_value = "a")]
        from: GenomeArg,
        /// How to report positions that map to an interval
        #[arg(short = 's', long, default_value = "both")]
        side: SideArg,
        /// Output file (optional, stdout if not specified)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Print the breakpoint table of every chromosome pair
    Anchors {
        #[command(flatten)]
        genomes: GenomeArgs,
        /// Output file (optional, stdout if not specified)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

fn build_mapper(args: &GenomeArgs) -> anyhow::Result<GenomeCoordinateMapper> {
    let start = Instant::now();
    if !args.gap.is_ascii() {
        anyhow::bail!("gap symbol must be a single ASCII character, got '{}'", args.gap);
    }

    eprintln!("Loading genomes: {:?}, {:?}", args.genome_a, args.genome_b);
    let source = FastaFiles::from_paths([&args.genome_a, &args.genome_b]);
    let key_a = args.genome_a.to_string_lossy();
    let key_b = args.genome_b.to_string_lossy();

    let options = BuildOptions {
        gap: args.gap as u8,
        threads: args.threads.max(1),
    };

    let mapper = match args.aligner {
        AlignerArg::None => {
            GenomeCoordinateMapper::from_source(&source, &key_a, &key_b, &PreAligned, options)?
        }
        AlignerArg::Muscle | AlignerArg::Mafft => {
            let kind = match args.aligner {
                AlignerArg::Mafft => AlignerKind::Mafft,
                _ => AlignerKind::Muscle,
            };
            let aligner = match &args.aligner_path {
                Some(path) => ExternalAligner::with_program(kind, path),
                None => ExternalAligner::new(kind),
            };
            GenomeCoordinateMapper::from_source(&source, &key_a, &key_b, &aligner, options)?
        }
    };

    eprintln!(
        "Indexed {} chromosome pair(s) in {:.2}s",
        mapper.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(mapper)
}

fn open_output(output: Option<&PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(std::fs::File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    })
}

/// Split `CHROM:POS` at the last colon; a bare name has no position
fn split_query(query: &str) -> anyhow::Result<(&str, Option<u64>)> {
    match query.rsplit_once(':') {
        Some((chrom, pos)) if !chrom.is_empty() => Ok((chrom, Some(parse_position(pos)?))),
        Some(_) => anyhow::bail!("invalid query '{}': empty chromosome name", query),
        None => Ok((query, None)),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Map { genomes, queries, from, side, output } => {
            let mapper = build_mapper(&genomes)?;
            let mut out = open_output(output.as_ref())?;
            let genome: Genome = from.into();

            let mut mapped = 0usize;
            let mut unmapped = 0usize;
            for query in &queries {
                let (chrom, pos) = split_query(query)?;
                let (partner, result) = mapper.map_to_other(genome, chrom, pos, side.into())?;
                match (pos, result) {
                    (Some(pos), Some(result)) => {
                        if result.is_mapped() {
                            mapped += 1;
                        } else {
                            unmapped += 1;
                        }
                        writeln!(out, "{}\t{}\t{}\t{}", chrom, pos, partner, result)?;
                    }
                    _ => writeln!(out, "{}\t.\t{}\t.", chrom, partner)?,
                }
            }
            out.flush()?;

            eprintln!("\n=== Mapping Statistics ===");
            eprintln!("Queries:         {}", queries.len());
            eprintln!("Mapped:          {}", mapped);
            eprintln!("Unmapped:        {}", unmapped);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Anchors { genomes, output } => {
            let mapper = build_mapper(&genomes)?;
            let mut out = open_output(output.as_ref())?;

            writeln!(out, "#chrom_a\tpos_a\tchrom_b\tpos_b")?;
            for (chrom_a, chrom_b) in mapper.chromosome_pairs() {
                let link = mapper.link(Genome::A, chrom_a)?;
                let (coords_a, coords_b) = link.index.anchors(Direction::AToB);
                for (pos_a, pos_b) in coords_a.iter().zip(coords_b) {
                    writeln!(out, "{}\t{}\t{}\t{}", chrom_a, pos_a, chrom_b, pos_b)?;
                }
            }
            out.flush()?;

            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_query() {
        assert_eq!(split_query("chr1:100").unwrap(), ("chr1", Some(100)));
        assert_eq!(split_query("HLA:A:7").unwrap(), ("HLA:A", Some(7)));
        assert_eq!(split_query("chr1").unwrap(), ("chr1", None));
        assert!(split_query("chr1:1.5").is_err());
        assert!(split_query(":5").is_err());
    }

    #[test]
    fn test_cli_parses_map() {
        let cli = Cli::try_parse_from([
            "coordmap", "map", "a.fa", "b.fa", "-q", "chr1:5", "-q", "chr2:7", "--side", "left",
            "--from", "b", "-t", "4",
        ])
        .unwrap();
        match cli.command {
            Commands::Map { genomes, queries, side, from, .. } => {
                assert_eq!(queries, vec!["chr1:5", "chr2:7"]);
                assert_eq!(Side::from(side), Side::Left);
                assert_eq!(Genome::from(from), Genome::B);
                assert_eq!(genomes.threads, 4);
                assert_eq!(genomes.gap, '-');
            }
            Commands::Anchors { .. } => panic!("expected map subcommand"),
        }
    }
}
