use std::path::{Path, PathBuf};

use crate::capture::domain::image_writer::ImageWriter;
use crate::capture::infrastructure::csv_sample_reader::read_samples;

/// Renders stored samples back into images: read → denormalize → write.
pub struct InspectSamplesUseCase {
    image_writer: Box<dyn ImageWriter>,
    /// Output magnification; 1 keeps the stored resolution.
    scale: u32,
    limit: Option<usize>,
}

impl InspectSamplesUseCase {
    pub fn new(image_writer: Box<dyn ImageWriter>, scale: u32, limit: Option<usize>) -> Self {
        Self {
            image_writer,
            scale: scale.max(1),
            limit,
        }
    }

    /// Writes `<index>.png` into `output_dir` for every sample in
    /// `samples_path` and returns the written paths in file order.
    pub fn execute(
        &self,
        samples_path: &Path,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
        let samples = read_samples(samples_path, self.limit)?;
        log::info!(
            "Loaded {} samples from {}",
            samples.len(),
            samples_path.display()
        );

        let mut written = Vec::with_capacity(samples.len());
        for (i, sample) in samples.iter().enumerate() {
            let path = output_dir.join(format!("{i}.png"));
            let size = if self.scale > 1 {
                let side = sample.size().checked_mul(self.scale).ok_or_else(|| {
                    format!(
                        "{}x upscale of a {} px sample is too large",
                        self.scale,
                        sample.size()
                    )
                })?;
                Some((side, side))
            } else {
                None
            };
            self.image_writer.write(&path, &sample.to_frame(), size)?;
            written.push(path);
        }
        Ok(written)
    }
}
