pub mod device;
pub mod mock;
pub mod output;

pub use output::AudioOutput;
