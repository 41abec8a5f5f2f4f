pub mod traits;
pub mod evolution;
pub mod run;
pub mod options;
pub mod manager;

pub use manager::{AppConfig, ConfigManager};
pub use evolution::EvolutionConfig;
pub use run::RunConfig;
pub use options::CgpOptions;
pub use traits::{ConfigManifest, ConfigSection, FieldManifest};
