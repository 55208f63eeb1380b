use crate::bio::PredictionRecord;
use crate::LtrMetaError;
use std::io::Write;

/// Write retained predictions as a comma-separated table
///
/// Column names follow the predictor data sheet so the file can be read
/// back with [`crate::bio::prediction::read_predictions`]. Missing values are
/// written as `NA`.
pub fn write_predictions_csv<W: Write>(
    writer: W,
    records: &[&PredictionRecord],
) -> Result<(), LtrMetaError> {
    let mut csv = csv::WriterBuilder::new().from_writer(writer);

    csv.write_record([
        "ID",
        "chromosome",
        "start",
        "end",
        "strand",
        "ltr_similarity",
        "width",
        "orfs",
        "PBS_start",
        "protein_domain",
        "TE_N_abs",
    ])?;

    fn na<T: ToString>(value: &Option<T>) -> String {
        value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "NA".to_string())
    }

    for record in records {
        csv.write_record([
            record.id.clone(),
            na(&record.chromosome),
            na(&record.start),
            na(&record.end),
            na(&record.strand),
            na(&record.similarity),
            na(&record.width),
            na(&record.orfs),
            na(&record.pbs_start),
            na(&record.protein_domain),
            na(&record.n_count),
        ])?;
    }

    csv.flush()?;
    Ok(())
}
