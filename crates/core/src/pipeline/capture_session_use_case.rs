use std::time::Instant;

use crate::capture::domain::frame_display::FrameDisplay;
use crate::capture::domain::frame_source::FrameSource;
use crate::capture::domain::key_source::{KeyCommand, KeySource};
use crate::capture::domain::sample_writer::SampleWriter;
use crate::pipeline::frame_annotator::annotate;
use crate::pipeline::frame_processor::{FrameOutcome, FrameProcessor};
use crate::pipeline::session_logger::SessionLogger;
use crate::sampling::face_sample::FaceSample;
use crate::shared::constants::{FACE_WINDOW, FRAME_WINDOW, SAMPLE_WINDOW};
use crate::shared::frame::Frame;

/// State carried from one frame to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureState {
    /// Set by the capture key; cleared once a sample has been written.
    pub armed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

#[derive(Debug)]
pub struct StepResult {
    pub state: CaptureState,
    pub outcome: FrameOutcome,
    pub sample_written: bool,
    pub control: LoopControl,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames: usize,
    /// Frames where a face was found, with or without a usable crop.
    pub faces: usize,
    pub samples: usize,
}

/// Interactive capture loop: read → detect → show → poll key → maybe write.
///
/// `run` owns the loop; `step` handles a single frame and can be driven
/// directly.
pub struct CaptureSessionUseCase {
    source: Box<dyn FrameSource>,
    processor: FrameProcessor,
    display: Box<dyn FrameDisplay>,
    keys: Box<dyn KeySource>,
    writer: Box<dyn SampleWriter>,
    logger: Box<dyn SessionLogger>,
    sample_size: u32,
    key_wait_ms: i32,
}

impl CaptureSessionUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Box<dyn FrameSource>,
        processor: FrameProcessor,
        display: Box<dyn FrameDisplay>,
        keys: Box<dyn KeySource>,
        writer: Box<dyn SampleWriter>,
        logger: Box<dyn SessionLogger>,
        sample_size: u32,
        key_wait_ms: i32,
    ) -> Self {
        Self {
            source,
            processor,
            display,
            keys,
            writer,
            logger,
            sample_size,
            key_wait_ms,
        }
    }

    /// Processes one frame with the given state and returns the next state.
    pub fn step(
        &mut self,
        mut frame: Frame,
        state: CaptureState,
    ) -> Result<StepResult, Box<dyn std::error::Error>> {
        let index = frame.index();

        let t0 = Instant::now();
        let outcome = self.processor.process(&frame)?;
        self.logger
            .timing("detect", t0.elapsed().as_secs_f64() * 1000.0);
        self.logger.frame(index, &outcome);

        let t1 = Instant::now();
        annotate(&mut frame, &outcome, state.armed);

        let mut next = state;
        let mut sample_written = false;
        if let FrameOutcome::Detected(obs) = &outcome {
            self.display.show(FACE_WINDOW, &obs.crop)?;
            if state.armed {
                let sample = FaceSample::from_crop(&obs.crop, self.sample_size)?;
                self.display.show(SAMPLE_WINDOW, &sample.to_frame())?;
                self.writer.append(&sample)?;
                self.logger.sample_written(index);
                next.armed = false;
                sample_written = true;
            }
        }
        self.display.show(FRAME_WINDOW, &frame)?;
        self.logger
            .timing("display", t1.elapsed().as_secs_f64() * 1000.0);

        let mut control = LoopControl::Continue;
        if let Some(key) = self.keys.poll_key(self.key_wait_ms)? {
            match KeyCommand::from_key(key) {
                Some(KeyCommand::Quit) => control = LoopControl::Stop,
                Some(KeyCommand::Capture) => {
                    if !next.armed {
                        self.logger.info("Capture armed");
                    }
                    next.armed = true;
                }
                None => {}
            }
        }

        Ok(StepResult {
            state: next,
            outcome,
            sample_written,
            control,
        })
    }

    /// Runs until the quit key or the end of the source.
    ///
    /// The source and display are closed and the writer flushed whether the
    /// loop ends normally or with an error.
    pub fn run(&mut self) -> Result<SessionSummary, Box<dyn std::error::Error>> {
        let result = self.drive();

        self.source.close();
        self.display.close();
        let flushed = self.writer.flush();
        self.logger.summary();

        let summary = result?;
        flushed?;
        Ok(summary)
    }

    fn drive(&mut self) -> Result<SessionSummary, Box<dyn std::error::Error>> {
        let mut state = CaptureState::default();
        let mut summary = SessionSummary::default();

        while let Some(frame) = self.source.read()? {
            let result = self.step(frame, state)?;
            summary.frames += 1;
            if result.outcome.face().is_some() {
                summary.faces += 1;
            }
            if result.sample_written {
                summary.samples += 1;
            }
            state = result.state;
            if result.control == LoopControl::Stop {
                self.logger.info("Quit requested");
                break;
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::eye_detector::EyeDetector;
    use crate::detection::domain::face_detector::FaceDetector;
    use crate::pipeline::session_logger::NullSessionLogger;
    use crate::shared::rect::Rect;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubSource {
        frames: VecDeque<Frame>,
        fail_after: Option<usize>,
        reads: usize,
        closed: Arc<Mutex<bool>>,
    }

    impl FrameSource for StubSource {
        fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
            if self.fail_after == Some(self.reads) {
                return Err("camera unplugged".into());
            }
            self.reads += 1;
            Ok(self.frames.pop_front())
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() = true;
        }
    }

    struct StubFaceDetector {
        faces: Vec<Rect>,
    }

    impl FaceDetector for StubFaceDetector {
        fn detect_faces(&mut self, _gray: &Frame) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
            Ok(self.faces.clone())
        }
    }

    struct StubEyeDetector {
        eyes: Vec<Rect>,
    }

    impl EyeDetector for StubEyeDetector {
        fn detect_eyes(&mut self, _face: &Frame) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
            Ok(self.eyes.clone())
        }
    }

    #[derive(Default)]
    struct DisplayLog {
        shown: Vec<(String, u32, u32)>,
        closed: bool,
    }

    struct RecordingDisplay {
        log: Arc<Mutex<DisplayLog>>,
    }

    impl FrameDisplay for RecordingDisplay {
        fn show(&mut self, window: &str, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.log
                .lock()
                .unwrap()
                .shown
                .push((window.to_string(), frame.width(), frame.height()));
            Ok(())
        }

        fn close(&mut self) {
            self.log.lock().unwrap().closed = true;
        }
    }

    struct ScriptedKeys {
        keys: VecDeque<Option<char>>,
    }

    impl KeySource for ScriptedKeys {
        fn poll_key(&mut self, _wait_ms: i32) -> Result<Option<char>, Box<dyn std::error::Error>> {
            Ok(self.keys.pop_front().flatten())
        }
    }

    #[derive(Default)]
    struct WriterLog {
        samples: Vec<FaceSample>,
        flushes: usize,
    }

    struct RecordingWriter {
        log: Arc<Mutex<WriterLog>>,
    }

    impl SampleWriter for RecordingWriter {
        fn append(&mut self, sample: &FaceSample) -> Result<(), Box<dyn std::error::Error>> {
            self.log.lock().unwrap().samples.push(sample.clone());
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.log.lock().unwrap().flushes += 1;
            Ok(())
        }
    }

    // --- Helpers ---

    struct Harness {
        use_case: CaptureSessionUseCase,
        source_closed: Arc<Mutex<bool>>,
        display: Arc<Mutex<DisplayLog>>,
        writer: Arc<Mutex<WriterLog>>,
    }

    fn make_frames(count: usize) -> VecDeque<Frame> {
        (0..count)
            .map(|i| Frame::new(vec![90; 200 * 200 * 3], 200, 200, 3, i))
            .collect()
    }

    fn face() -> Rect {
        Rect::new(40, 40, 120, 120)
    }

    fn two_eyes() -> Vec<Rect> {
        vec![Rect::new(25, 30, 20, 20), Rect::new(75, 30, 20, 20)]
    }

    fn harness(
        frames: VecDeque<Frame>,
        faces: Vec<Rect>,
        eyes: Vec<Rect>,
        keys: Vec<Option<char>>,
        fail_after: Option<usize>,
    ) -> Harness {
        let source_closed = Arc::new(Mutex::new(false));
        let display = Arc::new(Mutex::new(DisplayLog::default()));
        let writer = Arc::new(Mutex::new(WriterLog::default()));
        let use_case = CaptureSessionUseCase::new(
            Box::new(StubSource {
                frames,
                fail_after,
                reads: 0,
                closed: source_closed.clone(),
            }),
            FrameProcessor::new(
                Box::new(StubFaceDetector { faces }),
                Box::new(StubEyeDetector { eyes }),
            ),
            Box::new(RecordingDisplay {
                log: display.clone(),
            }),
            Box::new(ScriptedKeys { keys: keys.into() }),
            Box::new(RecordingWriter {
                log: writer.clone(),
            }),
            Box::new(NullSessionLogger),
            64,
            1,
        );
        Harness {
            use_case,
            source_closed,
            display,
            writer,
        }
    }

    fn windows(h: &Harness) -> Vec<String> {
        h.display
            .lock()
            .unwrap()
            .shown
            .iter()
            .map(|(w, _, _)| w.clone())
            .collect()
    }

    // --- step ---

    #[test]
    fn test_step_without_face_only_shows_frame() {
        let mut h = harness(VecDeque::new(), vec![], vec![], vec![None], None);
        let frame = make_frames(1).pop_front().unwrap();
        let result = h.use_case.step(frame, CaptureState::default()).unwrap();

        assert_eq!(result.outcome, FrameOutcome::NoFace);
        assert_eq!(result.control, LoopControl::Continue);
        assert!(!result.sample_written);
        assert_eq!(windows(&h), vec![FRAME_WINDOW]);
    }

    #[test]
    fn test_step_with_face_but_no_eyes_shows_no_crop() {
        let mut h = harness(VecDeque::new(), vec![face()], vec![], vec![None], None);
        let frame = make_frames(1).pop_front().unwrap();
        let result = h
            .use_case
            .step(frame, CaptureState { armed: true })
            .unwrap();

        assert!(matches!(
            result.outcome,
            FrameOutcome::InsufficientEyes { eyes_found: 0, .. }
        ));
        // armed survives until a crop is available
        assert!(result.state.armed);
        assert_eq!(windows(&h), vec![FRAME_WINDOW]);
        assert!(h.writer.lock().unwrap().samples.is_empty());
    }

    #[test]
    fn test_step_shows_crop_when_detected() {
        let mut h = harness(VecDeque::new(), vec![face()], two_eyes(), vec![None], None);
        let frame = make_frames(1).pop_front().unwrap();
        let result = h.use_case.step(frame, CaptureState::default()).unwrap();

        assert!(matches!(result.outcome, FrameOutcome::Detected(_)));
        assert_eq!(windows(&h), vec![FACE_WINDOW, FRAME_WINDOW]);
        // eye distance 50 → 80 px square
        let shown = &h.display.lock().unwrap().shown;
        assert_eq!((shown[0].1, shown[0].2), (80, 80));
        assert_eq!((shown[1].1, shown[1].2), (200, 200));
    }

    #[test]
    fn test_armed_step_writes_one_sample_and_disarms() {
        let mut h = harness(VecDeque::new(), vec![face()], two_eyes(), vec![None], None);
        let frame = make_frames(1).pop_front().unwrap();
        let result = h
            .use_case
            .step(frame, CaptureState { armed: true })
            .unwrap();

        assert!(result.sample_written);
        assert!(!result.state.armed);
        assert_eq!(windows(&h), vec![FACE_WINDOW, SAMPLE_WINDOW, FRAME_WINDOW]);

        let log = h.writer.lock().unwrap();
        assert_eq!(log.samples.len(), 1);
        assert_eq!(log.samples[0].size(), 64);
        assert_eq!(log.samples[0].values().len(), 4096);
    }

    #[test]
    fn test_capture_key_arms_next_step() {
        let mut h = harness(VecDeque::new(), vec![], vec![], vec![Some('a')], None);
        let frame = make_frames(1).pop_front().unwrap();
        let result = h.use_case.step(frame, CaptureState::default()).unwrap();
        assert!(result.state.armed);
        assert_eq!(result.control, LoopControl::Continue);
    }

    #[test]
    fn test_quit_key_stops() {
        let mut h = harness(VecDeque::new(), vec![], vec![], vec![Some('q')], None);
        let frame = make_frames(1).pop_front().unwrap();
        let result = h.use_case.step(frame, CaptureState::default()).unwrap();
        assert_eq!(result.control, LoopControl::Stop);
    }

    #[test]
    fn test_unknown_key_ignored() {
        let mut h = harness(VecDeque::new(), vec![], vec![], vec![Some('x')], None);
        let frame = make_frames(1).pop_front().unwrap();
        let result = h.use_case.step(frame, CaptureState::default()).unwrap();
        assert_eq!(result.control, LoopControl::Continue);
        assert!(!result.state.armed);
    }

    // --- run ---

    #[test]
    fn test_run_until_end_of_stream() {
        let mut h = harness(make_frames(5), vec![], vec![], vec![], None);
        let summary = h.use_case.run().unwrap();

        assert_eq!(
            summary,
            SessionSummary {
                frames: 5,
                faces: 0,
                samples: 0
            }
        );
        assert!(*h.source_closed.lock().unwrap());
        assert!(h.display.lock().unwrap().closed);
        assert_eq!(h.writer.lock().unwrap().flushes, 1);
    }

    #[test]
    fn test_run_stops_on_quit() {
        let mut h = harness(
            make_frames(10),
            vec![],
            vec![],
            vec![None, None, Some('q')],
            None,
        );
        let summary = h.use_case.run().unwrap();
        assert_eq!(summary.frames, 3);
    }

    #[test]
    fn test_run_continues_through_faces_without_eyes() {
        let mut h = harness(make_frames(6), vec![face()], vec![], vec![Some('a')], None);
        let summary = h.use_case.run().unwrap();

        assert_eq!(
            summary,
            SessionSummary {
                frames: 6,
                faces: 6,
                samples: 0
            }
        );
        assert!(!windows(&h).iter().any(|w| w == FACE_WINDOW));
        assert!(!windows(&h).iter().any(|w| w == SAMPLE_WINDOW));
        assert!(h.writer.lock().unwrap().samples.is_empty());
    }

    #[test]
    fn test_step_with_face_but_no_eyes_continues() {
        let mut h = harness(VecDeque::new(), vec![face()], vec![], vec![None], None);
        let frame = make_frames(1).pop_front().unwrap();
        let result = h.use_case.step(frame, CaptureState::default()).unwrap();
        assert_eq!(result.control, LoopControl::Continue);
    }

    #[test]
    fn test_capture_flag_is_one_shot() {
        // armed on frame 0, written on frame 1, nothing further
        let mut h = harness(
            make_frames(4),
            vec![face()],
            two_eyes(),
            vec![Some('a')],
            None,
        );
        let summary = h.use_case.run().unwrap();

        assert_eq!(summary.frames, 4);
        assert_eq!(summary.faces, 4);
        assert_eq!(summary.samples, 1);
        assert_eq!(h.writer.lock().unwrap().samples.len(), 1);
    }

    #[test]
    fn test_run_closes_everything_on_read_error() {
        let mut h = harness(make_frames(5), vec![], vec![], vec![], Some(2));
        let err = h.use_case.run().unwrap_err();

        assert!(err.to_string().contains("camera unplugged"));
        assert!(*h.source_closed.lock().unwrap());
        assert!(h.display.lock().unwrap().closed);
        assert_eq!(h.writer.lock().unwrap().flushes, 1);
    }

    #[test]
    fn test_run_on_empty_source() {
        let mut h = harness(VecDeque::new(), vec![], vec![], vec![], None);
        assert_eq!(h.use_case.run().unwrap(), SessionSummary::default());
    }
}
