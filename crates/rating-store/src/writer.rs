//! Writer for prediction output.
//!
//! Every prediction becomes one line, `userId,movieId,predictedRating`,
//! written in the order the predictions are handed over.

use crate::error::{DataLoadError, Result};
use crate::types::Prediction;
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

/// Most decimals worth printing for an `f64` rating
pub const MAX_PRECISION: usize = 17;

/// Streams predictions to any `Write` sink
pub struct PredictionWriter<W: Write> {
    inner: W,
    /// Fixed number of decimals; `None` uses the shortest exact form
    precision: Option<usize>,
    written: usize,
}

impl PredictionWriter<BufWriter<File>> {
    /// Create (or truncate) an output file
    pub fn create(path: &Path) -> Result<Self> {
        match File::create(path) {
            Ok(file) => Ok(Self::new(BufWriter::new(file))),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(DataLoadError::FileNotFound {
                path: path.display().to_string(),
            }),
            Err(e) => Err(DataLoadError::IoError(e)),
        }
    }
}

impl<W: Write> PredictionWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            precision: None,
            written: 0,
        }
    }

    /// Round ratings to a fixed number of decimals (builder pattern).
    ///
    /// Capped at [`MAX_PRECISION`].
    pub fn with_precision(mut self, precision: Option<usize>) -> Self {
        self.precision = precision.map(|digits| digits.min(MAX_PRECISION));
        self
    }

    /// Write a single prediction line
    pub fn write(&mut self, prediction: &Prediction) -> Result<()> {
        writeln!(self.inner, "{}", format_prediction(prediction, self.precision))?;
        self.written += 1;
        Ok(())
    }

    /// Write every prediction, preserving order
    pub fn write_all<'a, I>(&mut self, predictions: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Prediction>,
    {
        for prediction in predictions {
            self.write(prediction)?;
        }
        Ok(())
    }

    /// Number of lines written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and hand back the underlying sink
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Format one output line (without the trailing newline)
pub fn format_prediction(prediction: &Prediction, precision: Option<usize>) -> String {
    match precision {
        Some(digits) => format!(
            "{},{},{:.*}",
            prediction.user_id, prediction.movie_id, digits, prediction.rating
        ),
        None => format!(
            "{},{},{}",
            prediction.user_id, prediction.movie_id, prediction.rating
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Query;

    #[test]
    fn test_format_default() {
        let p = Prediction::new(Query::new(1, 10), 3.0);
        assert_eq!(format_prediction(&p, None), "1,10,3");

        let p = Prediction::new(Query::new(4, 2), 3.25);
        assert_eq!(format_prediction(&p, None), "4,2,3.25");
    }

    #[test]
    fn test_format_with_precision() {
        let p = Prediction::new(Query::new(1, 10), 2.0 / 3.0);
        assert_eq!(format_prediction(&p, Some(4)), "1,10,0.6667");
        assert_eq!(format_prediction(&p, Some(0)), "1,10,1");
    }

    #[test]
    fn test_writer_preserves_order() {
        let predictions = vec![
            Prediction::new(Query::new(3, 30), 1.5),
            Prediction::new(Query::new(1, 10), 0.0),
            Prediction::new(Query::new(2, 20), 4.0),
        ];

        let mut writer = PredictionWriter::new(Vec::new());
        writer.write_all(&predictions).unwrap();
        assert_eq!(writer.written(), 3);

        let bytes = writer.finish().unwrap();
        let output = String::from_utf8(bytes).unwrap();
        assert_eq!(output, "3,30,1.5\n1,10,0\n2,20,4\n");
    }

    #[test]
    fn test_precision_is_capped() {
        let mut writer = PredictionWriter::new(Vec::new()).with_precision(Some(1_000_000_000));
        writer.write(&Prediction::new(Query::new(1, 10), 0.5)).unwrap();

        let output = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(output, format!("1,10,{:.*}\n", MAX_PRECISION, 0.5));
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let result = PredictionWriter::create(Path::new("no/such/dir/out.csv"));
        assert!(matches!(result, Err(DataLoadError::FileNotFound { .. })));
    }
}
