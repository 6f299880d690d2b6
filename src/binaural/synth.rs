use std::f64::consts::TAU;

use tracing::debug;

use crate::{
    binaural::job::{BinauralJob, Section, ToneSpec},
    error::{WavIOError, WavIOResult},
    traits::{FrameSink, LogSink, ProgressSink},
    types::CancelToken,
};

/// Oscillator state of one output channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelState {
    /// Current frequency in cycles per second
    pub frequency: f64,
    /// Frequency change per frame
    pub freq_step: f64,
    /// Peak sample value
    pub amplitude: i64,
}

impl ChannelState {
    /// State at the first frame of a section lasting `frames` frames.
    pub fn start(tone: &ToneSpec, frames: u64) -> Self {
        let freq_step = if frames == 0 {
            0.0
        } else {
            (tone.end_hz - tone.start_hz) as f64 / frames as f64
        };
        ChannelState {
            frequency: tone.start_hz as f64,
            freq_step,
            amplitude: tone.amplitude,
        }
    }

    /// Sample value at global frame index `k`.
    ///
    /// `k` counts from the start of the audio, not the section, so the phase runs on
    /// across section boundaries.
    #[inline]
    pub fn sample(&self, k: u64, sample_rate: f64) -> i32 {
        let value = self.amplitude as f64 * (self.frequency * TAU * k as f64 / sample_rate).sin();
        value.round() as i32
    }

    #[inline]
    pub fn advance(&mut self) {
        self.frequency += self.freq_step;
    }
}

/// What one channel of a rendered section actually did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelReport {
    pub start_hz: i64,
    pub end_hz: i64,
    /// Frequency of the section's last frame, including accumulated rounding drift
    pub actual_end_hz: f64,
    pub amplitude: i64,
}

impl ChannelReport {
    fn new(tone: &ToneSpec, state: &ChannelState) -> Self {
        ChannelReport {
            start_hz: tone.start_hz,
            end_hz: tone.end_hz,
            actual_end_hz: state.frequency,
            amplitude: tone.amplitude,
        }
    }

    fn log(&self, log: &dyn LogSink, channel: &str) {
        log.append_line(&format!("{} channel", channel));
        log.append_line(&format!("  beginning frequency: {}", self.start_hz));
        log.append_line(&format!("  ending frequency: {}", self.end_hz));
        log.append_line(&format!(
            "  actual ending frequency (with rounding error): {}",
            self.actual_end_hz
        ));
        log.append_line(&format!("  amplitude: {}", self.amplitude));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionReport {
    pub index: usize,
    pub frames: u64,
    pub left: ChannelReport,
    pub right: ChannelReport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisReport {
    pub total_frames: u64,
    pub sections: Vec<SectionReport>,
}

/// Renders a [`BinauralJob`] into a [`FrameSink`].
pub struct Synthesizer<'a> {
    job: &'a BinauralJob,
    log: &'a dyn LogSink,
    progress: &'a dyn ProgressSink,
    cancel: Option<&'a CancelToken>,
    progress_interval: u64,
}

impl<'a> Synthesizer<'a> {
    /// Progress is reported once per second of audio by default.
    pub fn new(job: &'a BinauralJob, log: &'a dyn LogSink, progress: &'a dyn ProgressSink) -> Self {
        Synthesizer {
            job,
            log,
            progress,
            cancel: None,
            progress_interval: (job.sample_rate as u64).max(1),
        }
    }

    pub fn with_cancel(mut self, cancel: &'a CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Frames between progress updates; 0 is treated as 1.
    pub fn with_progress_interval(mut self, frames: u64) -> Self {
        self.progress_interval = frames.max(1);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.is_some_and(CancelToken::is_cancelled)
    }

    /// Streams every section into `sink`.
    ///
    /// The sink is not finished here; the caller owns it and closes it on success,
    /// failure and cancellation alike.
    ///
    /// # Errors
    ///
    /// [`WavIOError::Cancelled`] when the cancel token fires, or the first error of
    /// the sink.
    pub fn render<S: FrameSink + ?Sized>(&self, sink: &mut S) -> WavIOResult<SynthesisReport> {
        let total = self.job.preflight()?;
        let sample_rate = self.job.sample_rate as f64;
        let mut k: u64 = 0;
        let mut reports = Vec::with_capacity(self.job.sections.len());

        for section in &self.job.sections {
            if self.cancelled() {
                return Err(WavIOError::Cancelled { frames_written: k });
            }
            self.log.append_line(&format!("---- processing {}...", section.name()));
            let report = self.render_section(section, sink, &mut k, total, sample_rate)?;
            report.left.log(self.log, "left");
            report.right.log(self.log, "right");
            reports.push(report);
        }

        if total == 0 || k % self.progress_interval != 0 {
            self.progress.frames(k, total);
        }
        debug!(frames = k, "synthesis complete");
        Ok(SynthesisReport {
            total_frames: total,
            sections: reports,
        })
    }

    fn render_section<S: FrameSink + ?Sized>(
        &self,
        section: &Section,
        sink: &mut S,
        k: &mut u64,
        total: u64,
        sample_rate: f64,
    ) -> WavIOResult<SectionReport> {
        let frames = self.job.section_frames(section);
        let mut left = ChannelState::start(&section.left, frames);
        let mut right = ChannelState::start(&section.right, frames);

        for i in 0..frames {
            if *k >= total {
                break;
            }
            sink.push_frame(left.sample(*k, sample_rate), right.sample(*k, sample_rate))?;
            *k += 1;
            if *k % self.progress_interval == 0 {
                self.progress.frames(*k, total);
            }
            if self.cancelled() {
                return Err(WavIOError::Cancelled { frames_written: *k });
            }
            if i + 1 < frames {
                left.advance();
                right.advance();
            }
        }

        Ok(SectionReport {
            index: section.index,
            frames,
            left: ChannelReport::new(&section.left, &left),
            right: ChannelReport::new(&section.right, &right),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::KeyedConfig, error::ErrorKind, sinks::{MemoryLog, NullProgress}};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<(i32, i32)>,
        finished: bool,
    }

    impl FrameSink for RecordingSink {
        fn push_frame(&mut self, left: i32, right: i32) -> WavIOResult<()> {
            self.frames.push((left, right));
            Ok(())
        }

        fn frames_written(&self) -> u64 {
            self.frames.len() as u64
        }

        fn finish(&mut self) -> WavIOResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        calls: Mutex<Vec<(u64, u64)>>,
    }

    impl ProgressSink for RecordingProgress {
        fn update(&self, _label: &str, _font_hint: Option<&str>, _text: &str) {}

        fn frames(&self, done: u64, total: u64) {
            self.calls.lock().unwrap().push((done, total));
        }
    }

    fn job(text: &str) -> BinauralJob {
        BinauralJob::from_config(&KeyedConfig::parse(text)).unwrap()
    }

    const TWO_SECTIONS: &str = "\
[general]
samples per second = 100
[section 1]
left channel starting frequency Hz = 10
left channel ending frequency Hz = 10
right channel starting frequency Hz = 12
right channel ending frequency Hz = 12
left channel amplitude = 1000
right channel amplitude = 500
time duration in seconds = 1
[section 2]
left channel starting frequency Hz = 10
left channel ending frequency Hz = 20
right channel starting frequency Hz = 10
right channel ending frequency Hz = 20
time duration in seconds = 2
";

    #[test]
    fn test_frame_count_and_amplitude_bound() {
        let job = job(TWO_SECTIONS);
        let mut sink = RecordingSink::default();
        let report = Synthesizer::new(&job, &MemoryLog::new(), &NullProgress)
            .render(&mut sink)
            .unwrap();
        assert_eq!(sink.frames.len(), 300);
        assert_eq!(report.total_frames, 300);
        assert!(!sink.finished);
        for (i, &(l, r)) in sink.frames.iter().enumerate() {
            let (amp_l, amp_r) = if i < 100 { (1000, 500) } else { (10_000, 10_000) };
            assert!(l.abs() <= amp_l && r.abs() <= amp_r);
        }
    }

    #[test]
    fn test_phase_uses_global_index() {
        let job = job(TWO_SECTIONS);
        let mut sink = RecordingSink::default();
        Synthesizer::new(&job, &MemoryLog::new(), &NullProgress)
            .render(&mut sink)
            .unwrap();
        // First frame of section 2 is global frame 100 at 10 Hz.
        let expected = (10_000.0 * (10.0 * TAU * 100.0 / 100.0f64).sin()).round() as i32;
        assert_eq!(sink.frames[100].0, expected);
        let k = 37.0;
        let expected = (500.0 * (12.0 * TAU * k / 100.0f64).sin()).round() as i32;
        assert_eq!(sink.frames[37].1, expected);
    }

    #[test]
    fn test_actual_end_frequency_excludes_last_step() {
        let job = job(TWO_SECTIONS);
        let report = Synthesizer::new(&job, &MemoryLog::new(), &NullProgress)
            .render(&mut RecordingSink::default())
            .unwrap();
        let section = &report.sections[1];
        assert_eq!(section.frames, 200);
        let expected = 10.0 + 199.0 * (10.0 / 200.0);
        assert!((section.left.actual_end_hz - expected).abs() < 1e-9);
        assert!((section.left.actual_end_hz - 20.0).abs() > 1e-3);
        assert_eq!(report.sections[0].right.actual_end_hz, 12.0);
    }

    #[test]
    fn test_progress_reaches_total() {
        let job = job(TWO_SECTIONS);
        let progress = RecordingProgress::default();
        Synthesizer::new(&job, &MemoryLog::new(), &progress)
            .with_progress_interval(64)
            .render(&mut RecordingSink::default())
            .unwrap();
        let calls = progress.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![(64, 300), (128, 300), (192, 300), (256, 300), (300, 300)]);
    }

    #[test]
    fn test_progress_on_exact_multiple_is_not_repeated() {
        let job = job(TWO_SECTIONS);
        let progress = RecordingProgress::default();
        Synthesizer::new(&job, &MemoryLog::new(), &progress)
            .render(&mut RecordingSink::default())
            .unwrap();
        let calls = progress.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![(100, 300), (200, 300), (300, 300)]);
    }

    #[test]
    fn test_cancellation_stops_rendering() {
        let job = job(TWO_SECTIONS);
        let token = CancelToken::new();
        token.cancel();
        let mut sink = RecordingSink::default();
        let err = Synthesizer::new(&job, &MemoryLog::new(), &NullProgress)
            .with_cancel(&token)
            .render(&mut sink)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn test_section_log_lines() {
        let job = job(TWO_SECTIONS);
        let log = MemoryLog::new();
        Synthesizer::new(&job, &log, &NullProgress)
            .render(&mut RecordingSink::default())
            .unwrap();
        assert!(log.contains("---- processing section 2..."));
        assert!(log.contains("  beginning frequency: 10"));
        assert!(log.contains("  actual ending frequency (with rounding error): "));
        assert!(log.contains("  amplitude: 500"));
    }

    #[test]
    fn test_zero_length_job_reports_progress() {
        let job = job("[section 1]\ntime duration in seconds = 0\n");
        let progress = RecordingProgress::default();
        let report = Synthesizer::new(&job, &MemoryLog::new(), &progress)
            .render(&mut RecordingSink::default())
            .unwrap();
        assert_eq!(report.sections[0].left.actual_end_hz, 1.0);
        assert_eq!(progress.calls.lock().unwrap().clone(), vec![(0, 0)]);
    }

    #[test]
    fn test_hand_built_job_without_sample_rate() {
        let mut job = job("[section 1]\ntime duration in seconds = 2\n");
        job.sample_rate = 0;
        let progress = RecordingProgress::default();
        let mut sink = RecordingSink::default();
        let log = MemoryLog::new();
        let synth = Synthesizer::new(&job, &log, &progress);
        assert_eq!(synth.progress_interval, 1);

        let report = synth.render(&mut sink).unwrap();
        assert_eq!(report.total_frames, 0);
        assert!(sink.frames.is_empty());
        assert_eq!(progress.calls.lock().unwrap().clone(), vec![(0, 0)]);
    }
}
