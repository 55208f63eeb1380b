use crate::LtrMetaError;
use flate2::read::GzDecoder;
use memmap2::Mmap;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::line_ending,
    combinator::{map, opt},
    IResult,
};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Length and unknown-base count of one FASTA record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceSummary {
    pub id: String,
    pub length: u64,
    pub n_count: u64,
}

/// Size and quality of a whole genome file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenomeDescriptor {
    pub sequences: Vec<SequenceSummary>,
    pub total_length: u64,
    pub n_count: u64,
}

impl GenomeDescriptor {
    fn push(&mut self, summary: SequenceSummary) {
        self.total_length += summary.length;
        self.n_count += summary.n_count;
        self.sequences.push(summary);
    }

    /// Genome size in mega base pairs
    pub fn size_mbp(&self) -> f64 {
        self.total_length as f64 / 1_000_000.0
    }

    /// Fraction of unknown bases across the genome
    pub fn unknown_fraction(&self) -> f64 {
        if self.total_length == 0 {
            return 0.0;
        }
        self.n_count as f64 / self.total_length as f64
    }
}

/// Parse a FASTA header line, returning the record id
fn parse_header(input: &[u8]) -> IResult<&[u8], &str> {
    let (input, _) = tag(b">")(input)?;
    let (input, id) = map(
        take_till(|c: u8| c == b' ' || c == b'\t' || c == b'\n' || c == b'\r'),
        |s| std::str::from_utf8(s).unwrap_or(""),
    )(input)?;
    let (input, _) = take_till(|c: u8| c == b'\n' || c == b'\r')(input)?;
    let (input, _) = opt(line_ending)(input)?;
    Ok((input, id))
}

/// Count residues and N bases until the next header or EOF
fn scan_sequence(input: &[u8]) -> IResult<&[u8], (u64, u64)> {
    let mut length = 0u64;
    let mut n_count = 0u64;
    let mut remaining = input;

    while !remaining.is_empty() && remaining[0] != b'>' {
        let (rest, line) =
            take_till::<_, _, nom::error::Error<_>>(|c: u8| c == b'\n' || c == b'\r')(remaining)?;
        let (rest, _) = opt(line_ending)(rest)?;

        for &c in line {
            if c.is_ascii_whitespace() {
                continue;
            }
            length += 1;
            if c == b'N' || c == b'n' {
                n_count += 1;
            }
        }

        // A lone '\r' is not consumed by line_ending
        remaining = if rest.len() == remaining.len() { &rest[1..] } else { rest };
    }

    Ok((remaining, (length, n_count)))
}

/// Scan FASTA bytes into a genome descriptor
pub fn scan_fasta_bytes(data: &[u8]) -> Result<GenomeDescriptor, LtrMetaError> {
    let mut descriptor = GenomeDescriptor::default();
    let mut input = data;

    while !input.is_empty() {
        while !input.is_empty() && input[0].is_ascii_whitespace() {
            input = &input[1..];
        }

        if input.is_empty() {
            break;
        }

        if input[0] != b'>' {
            return Err(LtrMetaError::Parse(
                "FASTA data must start with a '>' header line".to_string(),
            ));
        }

        let (rest, id) = parse_header(input)
            .map_err(|e| LtrMetaError::Parse(format!("Failed to parse FASTA header: {:?}", e)))?;
        let (rest, (length, n_count)) = scan_sequence(rest)
            .map_err(|e| LtrMetaError::Parse(format!("Failed to parse FASTA sequence: {:?}", e)))?;

        descriptor.push(SequenceSummary {
            id: id.to_string(),
            length,
            n_count,
        });

        input = rest;
    }

    Ok(descriptor)
}

/// Scan a genome file (supports .gz compression)
pub fn scan_genome<P: AsRef<Path>>(path: P) -> Result<GenomeDescriptor, LtrMetaError> {
    let path = path.as_ref();

    let descriptor = if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        scan_genome_gzip(path)?
    } else {
        scan_genome_uncompressed(path)?
    };

    if descriptor.sequences.is_empty() || descriptor.total_length == 0 {
        return Err(LtrMetaError::Parse(format!(
            "Genome file {} contains no sequence data",
            path.display()
        )));
    }

    Ok(descriptor)
}

fn scan_genome_uncompressed(path: &Path) -> Result<GenomeDescriptor, LtrMetaError> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(GenomeDescriptor::default());
    }
    let mmap = unsafe { Mmap::map(&file)? };

    scan_fasta_bytes(&mmap[..])
}

fn scan_genome_gzip(path: &Path) -> Result<GenomeDescriptor, LtrMetaError> {
    let file = File::open(path)?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let mut buffer = Vec::new();
    decoder.read_to_end(&mut buffer)?;

    scan_fasta_bytes(&buffer)
}
