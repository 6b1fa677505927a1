use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::correction_pipeline::common::error::{CorrectionError, Result};
use crate::correction_pipeline::correction::sample_residuals;
use crate::correction_pipeline::regression::LinearModel;
use crate::correction_pipeline::sampling::EmbryoSample;

/// One sampled pixel with its model prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Index of the sample in the calibration's image selection.
    pub image_id: usize,
    pub x: usize,
    pub y: usize,
    pub primary_raw: f64,
    pub primary_smoothed: f64,
    pub predictor1_raw: f64,
    pub predictor1_smoothed: f64,
    /// Raw and smoothed predictor 2 values, when sampled.
    pub predictor2: Option<(f64, f64)>,
    pub predicted: f64,
    /// Smoothed primary minus prediction.
    pub residual: f64,
}

const BASE_COLUMNS: [&str; 7] = [
    "image_id",
    "x",
    "y",
    "primary_raw",
    "primary_smoothed",
    "predictor1_raw",
    "predictor1_smoothed",
];
const PREDICTOR2_COLUMNS: [&str; 2] = ["predictor2_raw", "predictor2_smoothed"];
const MODEL_COLUMNS: [&str; 2] = ["predicted", "residual"];

#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub two_predictor: bool,
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Builds one row per sampled pixel, samples in order.
    pub fn build(samples: &[EmbryoSample], model: &LinearModel) -> Result<Self> {
        let two_predictor = samples.first().is_some_and(|s| s.predictor2.is_some());
        if samples
            .iter()
            .any(|s| s.predictor2.is_some() != two_predictor)
        {
            return Err(CorrectionError::InconsistentSamples);
        }

        let total = samples.iter().map(EmbryoSample::len).sum();
        let mut rows = Vec::with_capacity(total);
        for (image_id, sample) in samples.iter().enumerate() {
            let residuals = sample_residuals(sample, model)?;
            for (i, (&(x, y), r)) in sample.coords.iter().zip(residuals).enumerate() {
                rows.push(ResultRow {
                    image_id,
                    x,
                    y,
                    primary_raw: sample.primary.raw[i],
                    primary_smoothed: sample.primary.smoothed[i],
                    predictor1_raw: sample.predictor1.raw[i],
                    predictor1_smoothed: sample.predictor1.smoothed[i],
                    predictor2: sample
                        .predictor2
                        .as_ref()
                        .map(|p2| (p2.raw[i], p2.smoothed[i])),
                    predicted: r.predicted,
                    residual: r.residual,
                });
            }
        }

        debug!(rows = rows.len(), "Result table assembled");
        Ok(Self {
            two_predictor,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = BASE_COLUMNS.to_vec();
        if self.two_predictor {
            columns.extend(PREDICTOR2_COLUMNS);
        }
        columns.extend(MODEL_COLUMNS);
        columns
    }

    /// Writes a header record and one record per row to `output`.
    ///
    /// The delimiter must be a single ASCII character.
    pub fn write_delimited<W: Write>(&self, output: W, delimiter: char) -> Result<()> {
        if !delimiter.is_ascii() {
            return Err(CorrectionError::InvalidDelimiter(delimiter));
        }
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter as u8)
            .from_writer(output);
        self.write_records(&mut writer)
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = csv::Writer::from_path(path)?;
        self.write_records(&mut writer)?;
        debug!(path = %path.display(), "Result table saved");
        Ok(())
    }

    fn write_records<W: Write>(&self, writer: &mut csv::Writer<W>) -> Result<()> {
        writer.write_record(self.columns())?;

        for row in &self.rows {
            let mut record = vec![
                row.image_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.primary_raw.to_string(),
                row.primary_smoothed.to_string(),
                row.predictor1_raw.to_string(),
                row.predictor1_smoothed.to_string(),
            ];
            if self.two_predictor {
                let (raw, smoothed) = row.predictor2.unwrap_or((f64::NAN, f64::NAN));
                record.push(raw.to_string());
                record.push(smoothed.to_string());
            }
            record.push(row.predicted.to_string());
            record.push(row.residual.to_string());
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}
