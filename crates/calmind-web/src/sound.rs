//! Ambient sound choices offered next to the chat box.
//!
//! The selection is independent of the companion: it is mapped to a static
//! audio reference and returned alongside the reply.

use serde::Serialize;

/// A calming sound the page can autoplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmbientSound {
    #[default]
    None,
    NatureSounds,
    RainSounds,
    OceanWaves,
    CatPurring,
    ViolinMusic,
}

impl AmbientSound {
    /// Dropdown order.
    pub const ALL: [AmbientSound; 6] = [
        AmbientSound::None,
        AmbientSound::NatureSounds,
        AmbientSound::RainSounds,
        AmbientSound::OceanWaves,
        AmbientSound::CatPurring,
        AmbientSound::ViolinMusic,
    ];

    /// Label shown in the dropdown and accepted by `/api/submit`.
    pub fn label(self) -> &'static str {
        match self {
            AmbientSound::None => "None",
            AmbientSound::NatureSounds => "Nature Sounds",
            AmbientSound::RainSounds => "Rain Sounds",
            AmbientSound::OceanWaves => "Ocean Waves",
            AmbientSound::CatPurring => "Cat Purring",
            AmbientSound::ViolinMusic => "Violin Music",
        }
    }

    /// Static audio resource, or `None` for silence.
    pub fn audio_ref(self) -> Option<&'static str> {
        match self {
            AmbientSound::None => None,
            AmbientSound::NatureSounds => Some("static/nature.mp3"),
            AmbientSound::RainSounds => Some("static/rain.mp3"),
            AmbientSound::OceanWaves => Some("static/waves.mp3"),
            AmbientSound::CatPurring => Some("static/cat.mp3"),
            AmbientSound::ViolinMusic => Some("static/violin.mp3"),
        }
    }

    /// Look up a dropdown label. Unknown labels mean silence.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(label))
            .unwrap_or_default()
    }
}

/// One dropdown entry as served by `GET /api/sounds`.
#[derive(Debug, Clone, Serialize)]
pub struct SoundChoice {
    pub label: &'static str,
    pub audio: Option<&'static str>,
}

impl From<AmbientSound> for SoundChoice {
    fn from(sound: AmbientSound) -> Self {
        Self {
            label: sound.label(),
            audio: sound.audio_ref(),
        }
    }
}
