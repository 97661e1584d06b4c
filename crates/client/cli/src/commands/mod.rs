mod replay;
mod settings;
mod timings;

pub use replay::Replay;
pub use settings::SettingsCommand;
pub use timings::Timings;
