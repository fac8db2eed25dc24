// SPDX-License-Identifier: MPL-2.0
//! Media sources and the rules that route them to a playback path.
//!
//! Two classification rules coexist:
//! - files picked through the open dialog are routed by MIME type prefix
//!   (`video/*` or `audio/*`);
//! - text typed into the URL entry is routed by suffix only (`.mp4` or `.mp3`).

use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Playback path a source is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Audio,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Audio => write!(f, "audio"),
        }
    }
}

/// Supported media extensions for the open dialog.
pub mod extensions {
    /// Audio extensions (audio/mpeg).
    pub const AUDIO_EXTENSIONS: &[&str] = &["mp3"];

    /// Video extensions (video/mp4).
    pub const VIDEO_EXTENSIONS: &[&str] = &["mp4"];

    /// All selectable extensions.
    pub const ALL_MEDIA_EXTENSIONS: &[&str] = &["mp3", "mp4"];
}

/// Where a session's media comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Local file.
    File(PathBuf),
    /// Network location handed to the demuxer as-is.
    Url(String),
}

impl MediaSource {
    /// Interprets free-form text from the URL entry or the command line.
    ///
    /// `file://` URLs become local paths. Anything with a scheme of two or
    /// more characters is kept as a URL; everything else is a path (this keeps
    /// Windows drive letters such as `C:\` on the path side).
    pub fn from_text(text: &str) -> Self {
        match Url::parse(text) {
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => MediaSource::File(path),
                Err(()) => MediaSource::Url(text.to_string()),
            },
            Ok(url) if url.scheme().len() > 1 => MediaSource::Url(text.to_string()),
            _ => MediaSource::File(PathBuf::from(text)),
        }
    }

    /// String handed to the demuxer.
    pub fn locator(&self) -> String {
        match self {
            MediaSource::File(path) => path.to_string_lossy().into_owned(),
            MediaSource::Url(url) => url.clone(),
        }
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::File(path) => write!(f, "{}", path.display()),
            MediaSource::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Routes a picked file by the prefix of its MIME type.
///
/// `None` (type unknown) and any non audio/video type yield `None`.
pub fn classify_mime(mime: Option<&str>) -> Option<MediaKind> {
    let mime = mime?;
    if mime.starts_with("video") {
        Some(MediaKind::Video)
    } else if mime.starts_with("audio") {
        Some(MediaKind::Audio)
    } else {
        None
    }
}

/// Routes URL entry text by its suffix. Matching is case-sensitive.
pub fn classify_url(text: &str) -> Option<MediaKind> {
    if text.ends_with(".mp4") {
        Some(MediaKind::Video)
    } else if text.ends_with(".mp3") {
        Some(MediaKind::Audio)
    } else {
        None
    }
}

/// Guesses the MIME type of a local file from its extension.
pub fn guess_mime(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_prefix_routes_video_and_audio() {
        assert_eq!(classify_mime(Some("video/mp4")), Some(MediaKind::Video));
        assert_eq!(classify_mime(Some("video/x-matroska")), Some(MediaKind::Video));
        assert_eq!(classify_mime(Some("audio/mpeg")), Some(MediaKind::Audio));
    }

    #[test]
    fn mime_other_or_missing_is_undefined() {
        assert_eq!(classify_mime(Some("text/plain")), None);
        assert_eq!(classify_mime(Some("application/octet-stream")), None);
        assert_eq!(classify_mime(None), None);
    }

    #[test]
    fn url_suffix_routes_mp4_and_mp3() {
        assert_eq!(classify_url("https://x/a.mp4"), Some(MediaKind::Video));
        assert_eq!(classify_url("http://x/a.mp3"), Some(MediaKind::Audio));
    }

    #[test]
    fn url_suffix_rejects_everything_else() {
        assert_eq!(classify_url("https://x/a.txt"), None);
        assert_eq!(classify_url("https://x/stream"), None);
        assert_eq!(classify_url("https://x/a.MP4"), None);
        assert_eq!(classify_url("https://x/a.mp4?token=1"), None);
    }

    #[test]
    fn guess_mime_uses_extension() {
        assert_eq!(guess_mime(Path::new("clip.mp4")).as_deref(), Some("video/mp4"));
        assert_eq!(guess_mime(Path::new("song.mp3")).as_deref(), Some("audio/mpeg"));
        assert_eq!(guess_mime(Path::new("notes")), None);
    }

    #[test]
    fn from_text_keeps_network_urls() {
        let source = MediaSource::from_text("https://example.com/a.mp4");
        assert_eq!(source, MediaSource::Url("https://example.com/a.mp4".to_string()));
    }

    #[test]
    fn from_text_treats_plain_text_as_path() {
        let source = MediaSource::from_text("/home/user/a.mp3");
        assert_eq!(source, MediaSource::File(PathBuf::from("/home/user/a.mp3")));
        assert_eq!(source.locator(), "/home/user/a.mp3");
    }

    #[cfg(unix)]
    #[test]
    fn from_text_converts_file_urls() {
        let source = MediaSource::from_text("file:///tmp/a.mp3");
        assert_eq!(source, MediaSource::File(PathBuf::from("/tmp/a.mp3")));
    }
}
