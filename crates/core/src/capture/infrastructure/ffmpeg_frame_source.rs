use std::path::{Path, PathBuf};

use ffmpeg_next::format::context::Input;
use ffmpeg_next::software::scaling;
use ffmpeg_next::util::frame::video::Video;

use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::frame_source::FrameSource;
use crate::shared::frame::Frame;

/// Replays a recorded video as a frame source via ffmpeg-next.
///
/// Each decoded frame is converted to RGB24. The end of the stream is
/// reported as `Ok(None)`.
pub struct FfmpegFrameSource {
    path: PathBuf,
    state: Option<DecodeState>,
    frame_index: usize,
}

struct DecodeState {
    ictx: Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: scaling::Context,
    width: u32,
    height: u32,
    video_stream_index: usize,
    flushing: bool,
    done: bool,
}

impl FfmpegFrameSource {
    pub fn open(path: &Path) -> Result<Self, CaptureError> {
        let unavailable = |e: ffmpeg_next::Error| {
            CaptureError::DeviceUnavailable(format!("{}: {e}", path.display()))
        };

        ffmpeg_next::init().map_err(unavailable)?;
        let ictx = ffmpeg_next::format::input(path).map_err(unavailable)?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or_else(|| {
                CaptureError::DeviceUnavailable(format!("{}: no video stream", path.display()))
            })?;
        let video_stream_index = stream.index();

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .map_err(unavailable)?;
        let decoder = codec_ctx.decoder().video().map_err(unavailable)?;

        let width = decoder.width();
        let height = decoder.height();
        let scaler = scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            scaling::Flags::BILINEAR,
        )
        .map_err(unavailable)?;

        log::info!("Opened {} ({width}x{height})", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            state: Some(DecodeState {
                ictx,
                decoder,
                scaler,
                width,
                height,
                video_stream_index,
                flushing: false,
                done: false,
            }),
            frame_index: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DecodeState {
    fn try_receive(&mut self, index: usize) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let mut decoded = Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }
        let mut rgb_frame = Video::empty();
        self.scaler.run(&decoded, &mut rgb_frame)?;
        let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);
        Ok(Some(Frame::new(pixels, self.width, self.height, 3, index)))
    }

    fn next_frame(&mut self, index: usize) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if self.done {
            return Ok(None);
        }
        loop {
            if let Some(frame) = self.try_receive(index)? {
                return Ok(Some(frame));
            }
            if self.flushing {
                self.done = true;
                return Ok(None);
            }
            match self.ictx.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() != self.video_stream_index {
                        continue;
                    }
                    // Corrupt packets are skipped rather than ending playback
                    if self.decoder.send_packet(&packet).is_err() {
                        continue;
                    }
                }
                None => {
                    let _ = self.decoder.send_eof();
                    self.flushing = true;
                }
            }
        }
    }
}

impl FrameSource for FfmpegFrameSource {
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let state = self.state.as_mut().ok_or(CaptureError::NotOpened)?;
        let frame = state
            .next_frame(self.frame_index)
            .map_err(|e| CaptureError::ReadFailed {
                index: self.frame_index,
                reason: e.to_string(),
            })?;
        if frame.is_some() {
            self.frame_index += 1;
        }
        Ok(frame)
    }

    fn close(&mut self) {
        if self.state.take().is_some() {
            log::debug!("Closed {}", self.path.display());
        }
    }
}

/// Copies RGB rows out of a possibly padded ffmpeg frame.
fn extract_rgb_pixels(rgb_frame: &Video, width: u32, height: u32) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
