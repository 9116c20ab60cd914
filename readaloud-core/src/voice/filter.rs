use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::voice::locale::{language_name, region_label};
use crate::voice::types::Voice;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum GenderFilter {
    #[default]
    All,
    Male,
    Female,
}

/// The gallery filter state: free-text search plus three independent
/// categorical selectors. `None` selectors mean "All".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceFilter {
    pub search: String,
    pub gender: GenderFilter,
    pub language: Option<String>,
    pub category: Option<String>,
}

impl VoiceFilter {
    pub fn is_neutral(&self) -> bool {
        self == &VoiceFilter::default()
    }

    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.search.is_empty() {
            parts.push(format!("search=\"{}\"", self.search));
        }
        if self.gender != GenderFilter::All {
            parts.push(format!("gender={}", self.gender));
        }
        if let Some(language) = &self.language {
            parts.push(format!("language={language}"));
        }
        if let Some(category) = &self.category {
            parts.push(format!("category={category}"));
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Pure projection of the catalog through the filter state. Only server
/// and preset voices are ever shown; browser voices never appear in the
/// gallery. All four predicates are ANDed.
pub fn filter_voices(voices: &[Voice], filter: &VoiceFilter) -> Vec<Voice> {
    let search = filter.search.to_lowercase();

    voices
        .iter()
        .filter(|v| matches!(v, Voice::Server { .. } | Voice::Preset { .. }))
        .filter(|v| matches_search(v, &search))
        .filter(|v| matches_gender(v, filter.gender))
        .filter(|v| matches_language(v, filter.language.as_deref()))
        .filter(|v| matches_category(v, filter.category.as_deref()))
        .cloned()
        .collect()
}

fn matches_search(voice: &Voice, lower_search: &str) -> bool {
    if lower_search.is_empty() {
        return true;
    }

    voice.name().to_lowercase().contains(lower_search)
        || voice.lang().to_lowercase().contains(lower_search)
        || region_label(voice.lang())
            .to_lowercase()
            .contains(lower_search)
        || language_name(voice.lang())
            .to_lowercase()
            .contains(lower_search)
        || voice
            .category()
            .is_some_and(|c| c.to_lowercase().contains(lower_search))
}

// The gender rule is an exact-substring convention over the display name,
// deliberately not a derived attribute: a voice whose name carries neither
// marker is excluded from non-All gender filters.
fn matches_gender(voice: &Voice, gender: GenderFilter) -> bool {
    match gender {
        GenderFilter::All => true,
        GenderFilter::Male => voice.name().contains("(Male)"),
        GenderFilter::Female => voice.name().contains("(Female)"),
    }
}

fn matches_language(voice: &Voice, language: Option<&str>) -> bool {
    match language {
        None => true,
        Some(selected) => language_name(voice.lang()) == selected,
    }
}

fn matches_category(voice: &Voice, category: Option<&str>) -> bool {
    match category {
        None => true,
        Some(selected) if selected.eq_ignore_ascii_case("standard") => {
            voice.category().is_none()
        }
        Some(selected) => voice
            .category()
            .is_some_and(|c| c.eq_ignore_ascii_case(selected)),
    }
}

/// Distinct language names across server voices, sorted. The option list
/// is derived from the catalog so it tracks whatever the backend returned.
pub fn available_languages(voices: &[Voice]) -> Vec<String> {
    let mut languages: Vec<String> = voices
        .iter()
        .filter(|v| matches!(v, Voice::Server { .. }))
        .map(|v| language_name(v.lang()))
        .collect();
    languages.sort();
    languages.dedup();
    languages
}

/// Distinct categories across all voices, title-cased and sorted.
pub fn available_categories(voices: &[Voice]) -> Vec<String> {
    let mut categories: Vec<String> = voices
        .iter()
        .filter_map(|v| v.category())
        .map(title_case)
        .collect();
    categories.sort();
    categories.dedup();
    categories
}

fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(id: &str, gender: &str, lang: &str) -> Voice {
        Voice::Server {
            id: id.to_string(),
            name: format!("{id} ({gender})"),
            lang: lang.to_string(),
        }
    }

    fn lincoln() -> Voice {
        Voice::Preset {
            id: "preset-lincoln".to_string(),
            name: "Abraham Lincoln".to_string(),
            lang: "en-US".to_string(),
            base_voice_id: "en-US-ChristopherNeural".to_string(),
            pitch: -15,
            rate: -0.15,
            category: "historical".to_string(),
        }
    }

    fn browser() -> Voice {
        Voice::Browser {
            id: "local-1".to_string(),
            name: "Samantha".to_string(),
            lang: "en-US".to_string(),
        }
    }

    fn catalog() -> Vec<Voice> {
        vec![
            lincoln(),
            server("en-US-AriaNeural", "Female", "en-US"),
            server("en-US-GuyNeural", "Male", "en-US"),
            server("ja-JP-NanamiNeural", "Female", "ja-JP"),
            browser(),
        ]
    }

    #[test]
    fn browser_voices_never_shown() {
        let voices = catalog();
        let shown = filter_voices(&voices, &VoiceFilter::default());
        assert_eq!(shown.len(), 4);
        assert!(shown.iter().all(|v| !matches!(v, Voice::Browser { .. })));
    }

    #[test]
    fn search_matches_preset_name() {
        let voices = catalog();
        let filter = VoiceFilter {
            search: "Lincoln".to_string(),
            ..Default::default()
        };
        let shown = filter_voices(&voices, &filter);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id(), "preset-lincoln");
    }

    #[test]
    fn search_matches_region_label() {
        // "american" hits the en-US region label of the server voices but
        // also Lincoln (same locale); narrow the catalog to the scenario.
        let voices = vec![lincoln(), server("en-US-AriaNeural", "Female", "en-US")];
        let filter = VoiceFilter {
            search: "american".to_string(),
            gender: GenderFilter::Female,
            ..Default::default()
        };
        let shown = filter_voices(&voices, &filter);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id(), "en-US-AriaNeural");
    }

    #[test]
    fn gender_filter_requires_literal_marker() {
        let voices = catalog();
        let filter = VoiceFilter {
            gender: GenderFilter::Female,
            ..Default::default()
        };
        let shown = filter_voices(&voices, &filter);
        // Lincoln has no gender marker in its name and is excluded
        let ids: Vec<&str> = shown.iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec!["en-US-AriaNeural", "ja-JP-NanamiNeural"]);

        let filter = VoiceFilter {
            gender: GenderFilter::Male,
            ..Default::default()
        };
        let shown = filter_voices(&voices, &filter);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id(), "en-US-GuyNeural");
    }

    #[test]
    fn language_filter_uses_mapped_name() {
        let voices = catalog();
        let filter = VoiceFilter {
            language: Some("Japanese".to_string()),
            ..Default::default()
        };
        let shown = filter_voices(&voices, &filter);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id(), "ja-JP-NanamiNeural");
    }

    #[test]
    fn category_standard_means_no_category() {
        let voices = catalog();
        let filter = VoiceFilter {
            category: Some("Standard".to_string()),
            ..Default::default()
        };
        let shown = filter_voices(&voices, &filter);
        assert_eq!(shown.len(), 3);
        assert!(shown.iter().all(|v| v.category().is_none()));
    }

    #[test]
    fn category_tag_matches_case_insensitively() {
        let voices = catalog();
        let filter = VoiceFilter {
            category: Some("Historical".to_string()),
            ..Default::default()
        };
        let shown = filter_voices(&voices, &filter);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id(), "preset-lincoln");
    }

    #[test]
    fn predicates_are_anded() {
        let voices = catalog();
        let filter = VoiceFilter {
            search: "neural".to_string(),
            gender: GenderFilter::Female,
            language: Some("English".to_string()),
            category: Some("Standard".to_string()),
        };
        let shown = filter_voices(&voices, &filter);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id(), "en-US-AriaNeural");
    }

    #[test]
    fn options_derived_from_catalog() {
        let voices = catalog();
        assert_eq!(available_languages(&voices), vec!["English", "Japanese"]);
        assert_eq!(available_categories(&voices), vec!["Historical"]);
    }

    #[test]
    fn gender_filter_parses_case_insensitively() {
        use std::str::FromStr;
        assert_eq!(GenderFilter::from_str("female").unwrap(), GenderFilter::Female);
        assert_eq!(GenderFilter::from_str("ALL").unwrap(), GenderFilter::All);
        assert!(GenderFilter::from_str("other").is_err());
    }
}
