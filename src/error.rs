// SPDX-License-Identifier: MPL-2.0
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("Playback Error: {0}")]
    Playback(#[from] PlaybackError),
}

/// Reasons a backend could not prepare or play a source.
///
/// Each variant maps to a translated message through [`PlaybackError::i18n_key`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Container format is not recognised.
    #[error("Unsupported media format")]
    UnsupportedFormat,

    /// No decoder available for the stream's codec.
    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(String),

    /// Source contains no stream of the requested kind.
    #[error("No playable stream found")]
    NoStream,

    /// Source could not be opened (missing file, refused connection, ...).
    #[error("Failed to open source: {0}")]
    Open(String),

    /// Decoding failed after the source was opened.
    #[error("Decoding failed: {0}")]
    Decoding(String),

    /// The audio device could not be opened or driven.
    #[error("Audio output error: {0}")]
    AudioOutput(String),

    /// Backend worker went away before answering.
    #[error("Playback backend disconnected")]
    Disconnected,

    #[error("{0}")]
    Other(String),
}

impl PlaybackError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            PlaybackError::UnsupportedFormat => "error-playback-unsupported-format",
            PlaybackError::UnsupportedCodec(_) => "error-playback-unsupported-codec",
            PlaybackError::NoStream => "error-playback-no-stream",
            PlaybackError::Open(_) => "error-playback-open",
            PlaybackError::Decoding(_) => "error-playback-decoding",
            PlaybackError::AudioOutput(_) => "error-playback-audio-output",
            PlaybackError::Disconnected | PlaybackError::Other(_) => "error-playback-general",
        }
    }

    /// Sorts a raw FFmpeg/decoder message into a specific variant.
    pub fn from_message(msg: &str) -> Self {
        let lower = msg.to_lowercase();

        // Codec errors may also say "not found", check them first.
        if lower.contains("codec") || lower.contains("decoder") {
            if let Some(codec) = Self::extract_codec_name(&lower) {
                return PlaybackError::UnsupportedCodec(codec);
            }
            return PlaybackError::Decoding(msg.to_string());
        }

        if lower.contains("no video stream")
            || lower.contains("no audio stream")
            || lower.contains("stream not found")
        {
            return PlaybackError::NoStream;
        }

        if lower.contains("no such file")
            || lower.contains("not found")
            || lower.contains("permission denied")
            || lower.contains("connection refused")
            || lower.contains("i/o error")
        {
            return PlaybackError::Open(msg.to_string());
        }

        if lower.contains("invalid data found") || lower.contains("unknown format") {
            return PlaybackError::UnsupportedFormat;
        }

        if lower.contains("packet")
            || lower.contains("scaling")
            || lower.contains("resampl")
            || lower.contains("decode")
        {
            return PlaybackError::Decoding(msg.to_string());
        }

        PlaybackError::Other(msg.to_string())
    }

    fn extract_codec_name(msg: &str) -> Option<String> {
        let codecs = [
            "h264", "hevc", "h265", "vp8", "vp9", "av1", "mpeg4", "mp3", "aac", "opus", "vorbis",
            "flac",
        ];
        codecs
            .iter()
            .find(|codec| msg.contains(*codec))
            .map(|codec| codec.to_uppercase())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<ffmpeg_next::Error> for PlaybackError {
    fn from(err: ffmpeg_next::Error) -> Self {
        PlaybackError::from_message(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let err: Error = std::io::Error::other("boom").into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn playback_error_wraps_into_error() {
        let err: Error = PlaybackError::NoStream.into();
        assert!(matches!(err, Error::Playback(PlaybackError::NoStream)));
        assert_eq!(err.to_string(), "Playback Error: No playable stream found");
    }

    #[test]
    fn from_message_detects_missing_file() {
        let err = PlaybackError::from_message("No such file or directory");
        assert!(matches!(err, PlaybackError::Open(_)));
    }

    #[test]
    fn from_message_detects_codec() {
        let err = PlaybackError::from_message("Decoder h264 not found");
        assert_eq!(err, PlaybackError::UnsupportedCodec("H264".to_string()));
    }

    #[test]
    fn from_message_detects_unknown_container() {
        let err = PlaybackError::from_message("Invalid data found when processing input");
        assert_eq!(err, PlaybackError::UnsupportedFormat);
    }

    #[test]
    fn from_message_detects_missing_stream() {
        let err = PlaybackError::from_message("No audio stream in source");
        assert_eq!(err, PlaybackError::NoStream);
    }

    #[test]
    fn from_message_falls_back_to_other() {
        let err = PlaybackError::from_message("something odd happened");
        assert!(matches!(err, PlaybackError::Other(_)));
    }

    #[test]
    fn i18n_keys_are_distinct_per_category() {
        assert_eq!(
            PlaybackError::UnsupportedFormat.i18n_key(),
            "error-playback-unsupported-format"
        );
        assert_eq!(PlaybackError::NoStream.i18n_key(), "error-playback-no-stream");
        assert_eq!(
            PlaybackError::Disconnected.i18n_key(),
            PlaybackError::Other(String::new()).i18n_key()
        );
    }
}
