// SPDX-License-Identifier: MPL-2.0
//! Worker-thread side of an FFmpeg backend: open, probe, demux, decode.
//!
//! FFmpeg contexts and the cpal stream never leave this thread.

use super::engine::{Shared, WorkerCommand};
use super::init_ffmpeg;
use super::output::AudioOutput;
use crate::error::PlaybackError;
use crate::media::MediaKind;
use crate::playback::backend::{DecodedFrame, MediaInfo, PrepareResult};
use crate::playback::clock::FrameAction;
use ffmpeg_next::{codec, decoder, format, frame, media, software, ChannelLayout};
use std::collections::VecDeque;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Sleep while paused, to avoid busy-waiting.
const IDLE_SLEEP: Duration = Duration::from_millis(10);

/// Sleep while enough output is queued.
const PACE_SLEEP: Duration = Duration::from_millis(5);

/// Decoded video frames kept ahead of the clock.
const MAX_QUEUED_FRAMES: usize = 6;

/// Audio queued ahead of the device, in seconds.
const AUDIO_LOOKAHEAD_SECS: f64 = 0.3;

/// Frames this close before a seek target are kept.
const SEEK_TOLERANCE_SECS: f64 = 0.02;

/// Worker entry point.
pub(super) fn run(
    kind: MediaKind,
    locator: &str,
    command_rx: mpsc::UnboundedReceiver<WorkerCommand>,
    shared: &Arc<Shared>,
    ready_tx: oneshot::Sender<PrepareResult>,
) {
    let mut pipeline = match Pipeline::open(kind, locator, shared) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            tracing::warn!(%kind, locator, %err, "failed to open media");
            let _ = ready_tx.send(Err(err));
            return;
        }
    };

    let info = MediaInfo {
        duration_ms: pipeline.duration_ms,
    };
    shared.clock.set_limit_ms(info.duration_ms);
    shared.duration_ms.store(info.duration_ms, Ordering::SeqCst);
    tracing::debug!(%kind, locator, duration_ms = info.duration_ms, "media prepared");
    if ready_tx.send(Ok(info)).is_err() {
        tracing::debug!(locator, "nobody awaits readiness, closing");
        return;
    }

    pipeline.run(command_rx);
    shared.playing.store(false, Ordering::SeqCst);
    tracing::debug!(locator, "decoder exited");
}

fn time_base_secs(stream: &format::stream::Stream<'_>) -> f64 {
    let time_base = stream.time_base();
    f64::from(time_base.numerator()) / f64::from(time_base.denominator())
}

#[allow(clippy::cast_precision_loss)]
fn pts_secs(timestamp: Option<i64>, time_base: f64) -> f64 {
    timestamp.map_or(0.0, |pts| pts as f64 * time_base)
}

struct VideoTrack {
    stream_index: usize,
    decoder: decoder::Video,
    scaler: software::scaling::Context,
    time_base: f64,
    width: u32,
    height: u32,
    seek_target: Option<f64>,
}

impl VideoTrack {
    fn open(stream: &format::stream::Stream<'_>) -> Result<Self, PlaybackError> {
        let context = codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = context.decoder().video()?;
        let width = decoder.width();
        let height = decoder.height();
        let scaler = software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            format::Pixel::RGBA,
            width,
            height,
            software::scaling::Flags::BILINEAR,
        )
        .map_err(|e| PlaybackError::Decoding(format!("scaling setup failed: {e}")))?;

        Ok(Self {
            stream_index: stream.index(),
            decoder,
            scaler,
            time_base: time_base_secs(stream),
            width,
            height,
            seek_target: None,
        })
    }

    /// Pulls every frame the decoder has ready, converted to RGBA.
    fn drain(&mut self) -> Vec<(f64, Vec<u8>)> {
        let mut frames = Vec::new();
        let mut decoded = frame::Video::empty();
        while self.decoder.receive_frame(&mut decoded).is_ok() {
            let pts = pts_secs(decoded.timestamp(), self.time_base);
            if let Some(target) = self.seek_target {
                if pts + SEEK_TOLERANCE_SECS < target {
                    continue;
                }
                self.seek_target = None;
            }
            let mut rgba = frame::Video::empty();
            if let Err(e) = self.scaler.run(&decoded, &mut rgba) {
                tracing::warn!(%e, "frame scaling failed");
                continue;
            }
            frames.push((pts, extract_rgba_data(&rgba)));
        }
        frames
    }
}

/// Copies RGBA rows out of a frame, dropping stride padding.
fn extract_rgba_data(frame: &frame::Video) -> Vec<u8> {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let data = frame.data(0);
    let stride = frame.stride(0);

    let mut rgba = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        let row_start = y * stride;
        rgba.extend_from_slice(&data[row_start..row_start + width * 4]);
    }
    rgba
}

struct AudioTrack {
    stream_index: usize,
    decoder: decoder::Audio,
    resampler: software::resampling::Context,
    time_base: f64,
    output: AudioOutput,
    output_channels: u16,
    seek_target: Option<f64>,
}

impl AudioTrack {
    fn open(
        stream: &format::stream::Stream<'_>,
        shared: &Arc<Shared>,
    ) -> Result<Self, PlaybackError> {
        let context = codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = context.decoder().audio()?;
        let output = AudioOutput::new(Arc::clone(&shared.output))?;

        // Downmix anything beyond stereo; the output spreads it over the device.
        let (layout, output_channels) = match output.channels() {
            1 => (ChannelLayout::MONO, 1),
            _ => (ChannelLayout::STEREO, 2),
        };
        let resampler = software::resampling::Context::get(
            decoder.format(),
            decoder.channel_layout(),
            decoder.rate(),
            format::Sample::F32(format::sample::Type::Packed),
            layout,
            output.sample_rate(),
        )
        .map_err(|e| PlaybackError::Decoding(format!("resampler setup failed: {e}")))?;

        Ok(Self {
            stream_index: stream.index(),
            decoder,
            resampler,
            time_base: time_base_secs(stream),
            output,
            output_channels,
            seek_target: None,
        })
    }

    /// Decodes, resamples and queues every frame the decoder has ready.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn drain(&mut self) {
        let rate = f64::from(self.output.sample_rate());
        let channels = usize::from(self.output_channels);
        let mut decoded = frame::Audio::empty();
        while self.decoder.receive_frame(&mut decoded).is_ok() {
            let mut resampled = frame::Audio::empty();
            if let Err(e) = self.resampler.run(&decoded, &mut resampled) {
                tracing::warn!(%e, "audio resampling failed");
                continue;
            }
            let samples = extract_samples(&resampled, self.output_channels);
            let mut skip = 0;

            if let Some(target) = self.seek_target {
                let pts = pts_secs(decoded.timestamp(), self.time_base);
                let frame_secs = (samples.len() / channels.max(1)) as f64 / rate;
                if pts + frame_secs < target {
                    continue;
                }
                // Drop the part of the first frame that precedes the target.
                skip = (((target - pts).max(0.0) * rate) as usize * channels).min(samples.len());
                self.seek_target = None;
            }

            self.output
                .push_interleaved(&samples[skip..], self.output_channels);
        }
    }

    fn needs_data(&self) -> bool {
        self.output.buffered_secs() < AUDIO_LOOKAHEAD_SECS
    }
}

/// Reads packed `f32` samples out of a resampled frame.
fn extract_samples(frame: &frame::Audio, channels: u16) -> Vec<f32> {
    let data = frame.data(0);
    let sample_count = frame.samples() * usize::from(channels);
    data.chunks_exact(4)
        .take(sample_count)
        .map(|bytes| f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        .collect()
}

struct Pipeline {
    input: format::context::Input,
    video: Option<VideoTrack>,
    audio: Option<AudioTrack>,
    shared: Arc<Shared>,
    duration_ms: u64,
    frames: VecDeque<DecodedFrame>,
    sequence: u64,
    playing: bool,
    /// Playback reached the end; the next Play restarts from zero.
    ended: bool,
    /// Decoders received end-of-stream and gave back their last frames.
    drained: bool,
    /// Paused seek: decode one frame for display.
    preview_pending: bool,
}

impl Pipeline {
    fn open(kind: MediaKind, locator: &str, shared: &Arc<Shared>) -> Result<Self, PlaybackError> {
        init_ffmpeg()?;
        let input = format::input(&locator)?;

        let video = match kind {
            MediaKind::Video => {
                let stream = input
                    .streams()
                    .best(media::Type::Video)
                    .ok_or(PlaybackError::NoStream)?;
                Some(VideoTrack::open(&stream)?)
            }
            MediaKind::Audio => None,
        };

        let audio = match (kind, input.streams().best(media::Type::Audio)) {
            (MediaKind::Audio, None) => return Err(PlaybackError::NoStream),
            (MediaKind::Audio, Some(stream)) => Some(AudioTrack::open(&stream, shared)?),
            (MediaKind::Video, None) => None,
            // A video plays silently when its sound cannot be played.
            (MediaKind::Video, Some(stream)) => match AudioTrack::open(&stream, shared) {
                Ok(track) => Some(track),
                Err(err) => {
                    tracing::warn!(locator, %err, "playing video without sound");
                    None
                }
            },
        };

        let duration_ms = probe_duration_ms(&input);

        Ok(Self {
            input,
            video,
            audio,
            shared: Arc::clone(shared),
            duration_ms,
            frames: VecDeque::with_capacity(MAX_QUEUED_FRAMES),
            sequence: 0,
            playing: false,
            ended: false,
            drained: false,
            preview_pending: false,
        })
    }

    fn run(&mut self, mut command_rx: mpsc::UnboundedReceiver<WorkerCommand>) {
        loop {
            loop {
                match command_rx.try_recv() {
                    Ok(WorkerCommand::Stop) | Err(mpsc::error::TryRecvError::Disconnected) => {
                        self.halt();
                        return;
                    }
                    Ok(command) => self.handle(command),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                }
            }

            if !self.playing {
                if self.preview_pending && self.video.is_some() {
                    self.read_packet();
                } else {
                    std::thread::sleep(IDLE_SLEEP);
                }
                continue;
            }

            self.present_due_frames();

            if self.wants_data() {
                self.read_packet();
            } else {
                std::thread::sleep(PACE_SLEEP);
            }
        }
    }

    fn handle(&mut self, command: WorkerCommand) {
        match command {
            WorkerCommand::Play => {
                if self.ended {
                    self.seek(0);
                }
                self.playing = true;
                self.preview_pending = false;
                self.shared.clock.resume();
                self.shared.output.set_paused(false);
                self.shared.playing.store(true, Ordering::SeqCst);
            }
            WorkerCommand::Pause => {
                self.playing = false;
                self.shared.clock.pause();
                self.shared.output.set_paused(true);
                self.shared.playing.store(false, Ordering::SeqCst);
            }
            WorkerCommand::Seek { position_ms } => self.seek(position_ms),
            WorkerCommand::Stop => self.halt(),
        }
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    fn seek(&mut self, position_ms: u64) {
        let target_secs = position_ms as f64 / 1_000.0;
        // AV_TIME_BASE units; the range lets FFmpeg land on the preceding keyframe.
        let timestamp = position_ms as i64 * 1_000;
        if let Err(e) = self.input.seek(timestamp, ..timestamp) {
            tracing::warn!(position_ms, %e, "seek failed");
            return;
        }

        if let Some(video) = self.video.as_mut() {
            video.decoder.flush();
            video.seek_target = Some(target_secs);
        }
        if let Some(audio) = self.audio.as_mut() {
            audio.decoder.flush();
            audio.output.clear();
            audio.seek_target = Some(target_secs);
        }
        self.frames.clear();
        self.shared.clock.seek_ms(position_ms);
        self.ended = false;
        self.drained = false;
        self.preview_pending = !self.playing;
    }

    fn halt(&mut self) {
        self.playing = false;
        self.shared.clock.pause();
        self.shared.output.set_paused(true);
        self.shared.playing.store(false, Ordering::SeqCst);
        if let Some(audio) = self.audio.as_ref() {
            audio.output.clear();
        }
    }

    fn wants_data(&self) -> bool {
        let video = self.video.is_some() && self.frames.len() < MAX_QUEUED_FRAMES;
        let audio = self.audio.as_ref().is_some_and(AudioTrack::needs_data);
        video || audio
    }

    /// Publishes the newest frame that is due; late frames before it are dropped.
    fn present_due_frames(&mut self) {
        let mut due = None;
        while let Some(front) = self.frames.front() {
            match self.shared.clock.frame_action(front.pts_secs) {
                FrameAction::Display | FrameAction::Skip => due = self.frames.pop_front(),
                FrameAction::Wait(_) => break,
            }
        }
        if let Some(frame) = due {
            self.shared.publish_frame(Some(frame));
        }
    }

    fn read_packet(&mut self) {
        let next = self
            .input
            .packets()
            .next()
            .map(|(stream, packet)| (stream.index(), packet));

        match next {
            Some((index, packet)) => self.dispatch(index, &packet),
            None => self.on_input_exhausted(),
        }
    }

    fn dispatch(&mut self, index: usize, packet: &ffmpeg_next::Packet) {
        if let Some(video) = self.video.as_mut().filter(|v| v.stream_index == index) {
            if let Err(e) = video.decoder.send_packet(packet) {
                tracing::debug!(%e, "video packet rejected");
                return;
            }
            let decoded = video.drain();
            self.queue_frames(decoded);
        } else if let Some(audio) = self.audio.as_mut().filter(|a| a.stream_index == index) {
            if let Err(e) = audio.decoder.send_packet(packet) {
                tracing::debug!(%e, "audio packet rejected");
                return;
            }
            audio.drain();
        }
    }

    fn queue_frames(&mut self, decoded: Vec<(f64, Vec<u8>)>) {
        let Some(video) = self.video.as_ref() else {
            return;
        };
        let (width, height) = (video.width, video.height);
        for (pts_secs, rgba) in decoded {
            self.sequence += 1;
            let frame = DecodedFrame {
                rgba_data: Arc::new(rgba),
                width,
                height,
                pts_secs,
                sequence: self.sequence,
            };
            if self.preview_pending {
                self.preview_pending = false;
                self.shared.publish_frame(Some(frame));
            } else {
                self.frames.push_back(frame);
            }
        }
    }

    fn on_input_exhausted(&mut self) {
        if !self.drained {
            self.drained = true;
            if let Some(video) = self.video.as_mut() {
                if video.decoder.send_eof().is_ok() {
                    let decoded = video.drain();
                    self.queue_frames(decoded);
                }
            }
            if let Some(audio) = self.audio.as_mut() {
                if audio.decoder.send_eof().is_ok() {
                    audio.drain();
                }
            }
            return;
        }

        self.preview_pending = false;
        let audio_pending = self
            .audio
            .as_ref()
            .is_some_and(|audio| audio.output.buffered_secs() > 0.0);
        if !self.frames.is_empty() || audio_pending {
            std::thread::sleep(PACE_SLEEP);
            return;
        }

        if self.playing {
            tracing::debug!(position_ms = self.shared.clock.current_ms(), "end of stream");
        }
        self.ended = true;
        self.halt();
    }
}

/// Container duration, falling back to the longest stream duration.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn probe_duration_ms(input: &format::context::Input) -> u64 {
    let container = input.duration();
    if container > 0 {
        // AV_TIME_BASE is microseconds.
        return container as u64 / 1_000;
    }
    input
        .streams()
        .filter(|stream| stream.duration() > 0)
        .map(|stream| (stream.duration() as f64 * time_base_secs(&stream) * 1_000.0) as u64)
        .max()
        .unwrap_or(0)
}
