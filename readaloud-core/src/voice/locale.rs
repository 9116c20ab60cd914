//! Locale lookup tables used by voice search and the gallery display.

/// Region labels for full locale tags. Search matches these so "american"
/// finds en-US voices.
const REGION_LABELS: &[(&str, &str)] = &[
    ("en-US", "American"),
    ("en-GB", "British"),
    ("en-AU", "Australian"),
    ("en-CA", "Canadian"),
    ("en-IN", "Indian"),
    ("en-IE", "Irish"),
    ("en-NZ", "New Zealand"),
    ("en-PH", "Filipino"),
    ("en-SG", "Singaporean"),
    ("en-ZA", "South African"),
    ("fr-FR", "French"),
    ("fr-CA", "Canadian French"),
    ("de-DE", "German"),
    ("it-IT", "Italian"),
    ("es-ES", "Spanish"),
    ("es-MX", "Mexican"),
    ("ja-JP", "Japanese"),
    ("ko-KR", "Korean"),
    ("zh-CN", "Chinese (Mandarin)"),
    ("zh-TW", "Taiwanese"),
    ("ru-RU", "Russian"),
    ("pt-BR", "Brazilian"),
    ("pt-PT", "Portuguese"),
    ("nl-NL", "Dutch"),
    ("tr-TR", "Turkish"),
    ("sv-SE", "Swedish"),
    ("pl-PL", "Polish"),
    ("hi-IN", "Indian (Hindi)"),
    ("ar-SA", "Arabic (Saudi)"),
    ("ar-EG", "Arabic (Egyptian)"),
];

/// Language names for locale prefixes, used by the language filter.
const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("az", "Azerbaijani"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fil", "Filipino"),
    ("fr", "French"),
    ("ga", "Irish"),
    ("gl", "Galician"),
    ("gu", "Gujarati"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("iu", "Inuktitut"),
    ("ja", "Japanese"),
    ("jv", "Javanese"),
    ("ka", "Georgian"),
    ("kk", "Kazakh"),
    ("km", "Khmer"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("lo", "Lao"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("mk", "Macedonian"),
    ("ml", "Malayalam"),
    ("mn", "Mongolian"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("mt", "Maltese"),
    ("my", "Burmese"),
    ("nb", "Norwegian"),
    ("ne", "Nepali"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("ps", "Pashto"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("so", "Somali"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("su", "Sundanese"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("uz", "Uzbek"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
    ("zu", "Zulu"),
];

/// Region label for a full locale tag ("en-US" -> "American"). Unmapped
/// locales fall back to the raw tag ("en-KE" -> "en-KE").
pub fn region_label(locale: &str) -> String {
    REGION_LABELS
        .iter()
        .find(|(tag, _)| *tag == locale)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| locale.to_string())
}

/// Language name for a locale ("en-US" -> "English"). Unmapped prefixes
/// fall back to the uppercased prefix ("xx-YY" -> "XX").
pub fn language_name(locale: &str) -> String {
    let prefix = locale.split('-').next().unwrap_or(locale);
    LANGUAGE_NAMES
        .iter()
        .find(|(tag, _)| *tag == prefix)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| prefix.to_uppercase())
}

/// Best-effort friendly name from a technical voice name.
///
/// "en-US-GuyNeural (Male)" -> "Guy", "en-IN-NeerjaExpressiveNeural" ->
/// "NeerjaExpressive". Total: any input that doesn't fit the convention
/// falls back to the raw name.
pub fn friendly_name(name: &str) -> String {
    let base = name.split('(').next().unwrap_or(name).trim();
    let last = base.split('-').next_back().unwrap_or(base);
    let stripped = last.replace("Neural", "").replace("Multilingual", "");
    if stripped.trim().is_empty() {
        name.to_string()
    } else {
        stripped
    }
}
