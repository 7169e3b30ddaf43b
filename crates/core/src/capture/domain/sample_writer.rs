use crate::sampling::face_sample::FaceSample;

/// Persists captured samples, one record per sample.
pub trait SampleWriter {
    fn append(&mut self, sample: &FaceSample) -> Result<(), Box<dyn std::error::Error>>;

    /// Pushes buffered records to the underlying storage.
    fn flush(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
