use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use std::path::Path;

/// Extensions accepted by the transcription endpoint.
const AUDIO_EXTENSIONS: &[&str] = &[
    "wav", "mp3", "m4a", "mp4", "mpeg", "mpga", "ogg", "webm", "flac",
];

pub fn is_supported_audio_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    AUDIO_EXTENSIONS.contains(&ext.as_str())
}

/// Wipe the visible conversation so a reset starts from a blank screen.
pub fn clear_screen() -> std::io::Result<()> {
    execute!(std::io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
}
