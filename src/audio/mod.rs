pub mod player;
pub mod wav;

pub use player::{AudioPlayer, PlaybackClock};
pub use wav::AudioData;

use std::path::Path;

/// Label shown for a track: the file name without its extension.
pub fn track_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
