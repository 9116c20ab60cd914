use crate::voice::types::Voice;

fn preset(
    id: &str,
    name: &str,
    lang: &str,
    base_voice_id: &str,
    pitch: i32,
    rate: f64,
    category: &str,
) -> Voice {
    Voice::Preset {
        id: id.to_string(),
        name: name.to_string(),
        lang: lang.to_string(),
        base_voice_id: base_voice_id.to_string(),
        pitch,
        rate,
        category: category.to_string(),
    }
}

/// The shipped preset identities. These always sort ahead of server voices
/// in the assembled catalog.
pub fn built_in_presets() -> Vec<Voice> {
    vec![
        // Presidents / historical
        preset(
            "preset-lincoln",
            "Abraham Lincoln",
            "en-US",
            "en-US-ChristopherNeural",
            -15,
            -0.15,
            "historical",
        ),
        preset(
            "preset-obama-sim",
            "Barack (Simulated)",
            "en-US",
            "en-US-RogerNeural",
            -5,
            -0.10,
            "celebrity",
        ),
        // Anime / cartoon
        preset(
            "preset-anime-girl",
            "Anime Schoolgirl",
            "ja-JP",
            "ja-JP-NanamiNeural",
            25,
            0.15,
            "anime",
        ),
        preset(
            "preset-anime-hero",
            "Shonen Hero",
            "ja-JP",
            "ja-JP-KeitaNeural",
            5,
            0.20,
            "anime",
        ),
        preset(
            "preset-chipmunk",
            "Squeaky Chipmunk",
            "en-US",
            "en-US-AnaNeural",
            50,
            0.30,
            "cartoon",
        ),
        preset(
            "preset-villain",
            "Movie Villain",
            "en-GB",
            "en-GB-RyanNeural",
            -30,
            -0.20,
            "cartoon",
        ),
        // Narration
        preset(
            "preset-narrator-epic",
            "Epic Narrator",
            "en-US",
            "en-US-EricNeural",
            -10,
            -0.05,
            "celebrity",
        ),
    ]
}
