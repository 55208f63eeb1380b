use crate::bio::PredictionRecord;
use crate::LtrMetaError;
use std::io::Write;

/// Write retained predictions as BED6
///
/// Data sheet coordinates are 1-based and inclusive, BED starts are 0-based.
/// The score column carries the rounded LTR similarity. Records without a
/// location are skipped; the number written is returned.
pub fn write_bed<W: Write>(
    writer: &mut W,
    records: &[&PredictionRecord],
) -> Result<usize, LtrMetaError> {
    let mut written = 0;

    for record in records {
        let location = (&record.chromosome, record.start, record.end);
        let (Some(chrom), Some(start), Some(end)) = location else {
            tracing::warn!(
                "Skipping {} in BED export: no chromosome/start/end",
                record.id
            );
            continue;
        };

        let score = record
            .similarity
            .map(|s| s.round().clamp(0.0, 1000.0) as u32)
            .unwrap_or(0);
        let strand = match record.strand.as_deref() {
            Some("+") => "+",
            Some("-") => "-",
            _ => ".",
        };

        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            chrom,
            start.saturating_sub(1),
            end,
            record.id,
            score,
            strand
        )?;
        written += 1;
    }

    Ok(written)
}
