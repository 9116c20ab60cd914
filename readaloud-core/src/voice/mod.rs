pub mod catalog;
pub mod filter;
pub mod locale;
pub mod presets;
pub mod types;

pub use catalog::Catalog;
pub use filter::{filter_voices, GenderFilter, VoiceFilter};
pub use types::Voice;
