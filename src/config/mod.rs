pub mod settings;

pub use settings::{AppConfig, HijriConfig, RemoteConfig};
