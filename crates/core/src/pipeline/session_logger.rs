use std::collections::HashMap;
use std::time::Instant;

use crate::pipeline::frame_processor::FrameOutcome;

/// Observer for capture-session events.
///
/// Keeps the session loop free of any particular output mechanism.
pub trait SessionLogger {
    /// Called once per processed frame with its outcome.
    fn frame(&mut self, index: usize, outcome: &FrameOutcome);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// A sample was written for frame `index`.
    fn sample_written(&mut self, index: usize);

    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events. Used by tests and library callers.
pub struct NullSessionLogger;

impl SessionLogger for NullSessionLogger {
    fn frame(&mut self, _index: usize, _outcome: &FrameOutcome) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn sample_written(&mut self, _index: usize) {}
    fn info(&mut self, _message: &str) {}
}

/// Running totals for one named stage.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StageStats {
    pub count: usize,
    pub total_ms: f64,
    pub max_ms: f64,
}

impl StageStats {
    fn record(&mut self, duration_ms: f64) {
        self.count += 1;
        self.total_ms += duration_ms;
        self.max_ms = self.max_ms.max(duration_ms);
    }

    pub fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms / self.count as f64
        }
    }
}

/// Tallies outcomes and stage timings and reports them through `log`.
///
/// Stage timings are kept as running totals. A progress line is emitted
/// every `throttle_frames` frames.
pub struct LogSessionLogger {
    throttle_frames: usize,
    timings: HashMap<String, StageStats>,
    outcomes: HashMap<&'static str, usize>,
    start_time: Instant,
    total_frames: usize,
    samples: usize,
}

impl LogSessionLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            outcomes: HashMap::new(),
            start_time: Instant::now(),
            total_frames: 0,
            samples: 0,
        }
    }

    /// Returns the formatted summary, or `None` before the first frame.
    pub fn summary_string(&self) -> Option<String> {
        if self.total_frames == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Session summary ({} frames, {} samples, {:.1}s):",
            self.total_frames,
            self.samples,
            elapsed_ms / 1000.0
        )];

        let mut labels: Vec<_> = self.outcomes.iter().collect();
        labels.sort();
        for (label, count) in labels {
            lines.push(format!("  {label:18}: {count}"));
        }

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let stats = &self.timings[stage];
            lines.push(format!(
                "  {stage:18}: avg {:6.1}ms  max {:6.1}ms  total {:7.0}ms",
                stats.avg_ms(),
                stats.max_ms,
                stats.total_ms
            ));
        }

        if elapsed_ms > 0.0 {
            let fps = self.total_frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn outcome_count(&self, label: &str) -> usize {
        self.outcomes.get(label).copied().unwrap_or(0)
    }

    pub fn stage_stats(&self, stage: &str) -> Option<&StageStats> {
        self.timings.get(stage)
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    pub fn samples(&self) -> usize {
        self.samples
    }
}

impl Default for LogSessionLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl SessionLogger for LogSessionLogger {
    fn frame(&mut self, index: usize, outcome: &FrameOutcome) {
        self.total_frames += 1;
        *self.outcomes.entry(outcome.label()).or_default() += 1;
        log::trace!("frame {index}: {}", outcome.label());
        if self.total_frames % self.throttle_frames == 0 {
            log::info!(
                "Processed {} frames ({} with a face crop, {} samples)",
                self.total_frames,
                self.outcome_count("detected"),
                self.samples
            );
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .record(duration_ms);
    }

    fn sample_written(&mut self, index: usize) {
        self.samples += 1;
        log::info!("Captured sample {} from frame {index}", self.samples);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
