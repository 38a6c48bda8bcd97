pub mod settings;

pub use settings::{AdmissionSettings, AppConfig, DatabaseSettings, PromotionPolicy, SeedingSettings};
