use crate::error::WavIOResult;

/// Label used for frame progress updates.
pub const PROGRESS_LABEL: &str = "progress";

/// Destination for the human-readable processing log.
///
/// Implementations must be usable from a worker thread while a host thread reads
/// the log, hence the `Send + Sync` bound.
pub trait LogSink: Send + Sync {
    /// Appends `text` and terminates the line.
    fn append_line(&self, text: &str);

    /// Appends `text` to the current line without terminating it.
    fn append_string(&self, text: &str);

    /// Appends `text` as one line to the persistent error log.
    fn append_to_error_file(&self, text: &str);

    /// Reports a terminal error for `filename` to both the log and the error file.
    fn report_error(&self, message: &str, filename: &str, details: &str) {
        let headline = format!("{} {}", message, filename);
        self.append_line(&headline);
        self.append_to_error_file(&headline);
        if !details.is_empty() {
            self.append_line(details);
            self.append_to_error_file(details);
        }
    }
}

/// Destination for status updates of a long running job.
pub trait ProgressSink: Send + Sync {
    /// Sets the text shown for `label`. `font_hint` is an opaque presentation token.
    fn update(&self, label: &str, font_hint: Option<&str>, text: &str);

    /// Reports that `done` of `total` frames have been produced.
    fn frames(&self, done: u64, total: u64) {
        self.update(
            PROGRESS_LABEL,
            None,
            &format!("Processing {} of {}", done, total),
        );
    }
}

/// Consumer of stereo sample frames, typically a [`crate::wav::WaveWriter`].
pub trait FrameSink {
    /// Appends one frame of signed sample values.
    fn push_frame(&mut self, left: i32, right: i32) -> WavIOResult<()>;

    fn frames_written(&self) -> u64;

    /// Completes the output. Calling it again has no effect.
    fn finish(&mut self) -> WavIOResult<()>;
}

impl<T: LogSink + ?Sized> LogSink for &T {
    fn append_line(&self, text: &str) {
        (**self).append_line(text)
    }

    fn append_string(&self, text: &str) {
        (**self).append_string(text)
    }

    fn append_to_error_file(&self, text: &str) {
        (**self).append_to_error_file(text)
    }
}

impl<T: ProgressSink + ?Sized> ProgressSink for &T {
    fn update(&self, label: &str, font_hint: Option<&str>, text: &str) {
        (**self).update(label, font_hint, text)
    }

    fn frames(&self, done: u64, total: u64) {
        (**self).frames(done, total)
    }
}
