use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::sampling::face_sample::FaceSample;

#[derive(Error, Debug)]
pub enum SampleReadError {
    #[error("cannot read samples from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: not a number: {token:?}")]
    Parse { line: usize, token: String },
    #[error("line {line}: {count} values do not form a square sample")]
    Size { line: usize, count: usize },
}

/// Loads samples written by [`super::csv_sample_writer::CsvSampleWriter`].
///
/// Accepts lines with or without a trailing separator. Blank lines are
/// skipped. Reading stops once `max_samples` samples have been collected.
pub fn read_samples(
    path: &Path,
    max_samples: Option<usize>,
) -> Result<Vec<FaceSample>, SampleReadError> {
    let io_err = |source| SampleReadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_err)?);
    let limit = max_samples.unwrap_or(usize::MAX);

    let mut samples = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        if samples.len() >= limit {
            break;
        }
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }
        samples.push(parse_sample_line(&line, i + 1)?);
    }
    Ok(samples)
}

/// Parses one line; `line_no` is 1-based and only used for error messages.
pub fn parse_sample_line(line: &str, line_no: usize) -> Result<FaceSample, SampleReadError> {
    let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
    let last = tokens.len() - 1;

    let mut values = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        match token.parse::<f32>() {
            Ok(v) => values.push(v),
            Err(_) if i == last && token.is_empty() => {}
            Err(_) => {
                return Err(SampleReadError::Parse {
                    line: line_no,
                    token: token.to_string(),
                })
            }
        }
    }

    let count = values.len();
    let size = (count as f64).sqrt().round() as usize;
    if count == 0 || size * size != count {
        return Err(SampleReadError::Size {
            line: line_no,
            count,
        });
    }

    FaceSample::new(size as u32, values).map_err(|_| SampleReadError::Size {
        line: line_no,
        count,
    })
}
