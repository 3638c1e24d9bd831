//! Sound cues

use std::fmt;

/// Short UI sounds fired on state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    TabOpen,
    TabClose,
    Click,
    DownloadComplete,
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SoundCue::TabOpen => "tab-open",
            SoundCue::TabClose => "tab-close",
            SoundCue::Click => "click",
            SoundCue::DownloadComplete => "download-complete",
        })
    }
}

/// Plays cues; fire-and-forget, failures are the player's business
#[cfg_attr(test, mockall::automock)]
pub trait SoundPlayer: Send {
    fn play(&self, cue: SoundCue);
}

/// Player that only logs the cue
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSoundPlayer;

impl SoundPlayer for LogSoundPlayer {
    fn play(&self, cue: SoundCue) {
        log::debug!("Sound cue: {}", cue);
    }
}
