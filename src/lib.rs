pub mod api;
pub mod config;
pub mod error;
pub mod generation;
pub mod metrics;
pub mod registry;
pub mod telemetry;

pub use api::{app, router, AppState};
pub use config::AppConfig;
pub use generation::{GenerationGateway, GenerationRequest, GenerationResult};
pub use registry::{VideoRecord, VideoRegistry};
