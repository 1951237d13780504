//! Content-type inference for the media the player actually ships: audio
//! tracks, lyric files and cover art. Anything else is served opaquely.

use std::path::Path;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Maps a file extension to its media type, case-insensitively.
pub fn from_extension(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return OCTET_STREAM;
    };
    match ext.to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "lrc" => "text/plain; charset=utf-8",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::{OCTET_STREAM, from_extension};
    use std::path::Path;

    #[test]
    fn maps_known_extensions() {
        assert_eq!(from_extension(Path::new("track.mp3")), "audio/mpeg");
        assert_eq!(
            from_extension(Path::new("track.lrc")),
            "text/plain; charset=utf-8"
        );
        assert_eq!(from_extension(Path::new("cover.jpg")), "image/jpeg");
        assert_eq!(from_extension(Path::new("cover.jpeg")), "image/jpeg");
        assert_eq!(from_extension(Path::new("cover.png")), "image/png");
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert_eq!(from_extension(Path::new("TRACK.MP3")), "audio/mpeg");
        assert_eq!(from_extension(Path::new("cover.Png")), "image/png");
    }

    #[test]
    fn unknown_or_missing_extensions_fall_back_to_octet_stream() {
        assert_eq!(from_extension(Path::new("notes.txt")), OCTET_STREAM);
        assert_eq!(from_extension(Path::new("archive.flac")), OCTET_STREAM);
        assert_eq!(from_extension(Path::new("README")), OCTET_STREAM);
    }
}
