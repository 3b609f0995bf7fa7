pub mod config;
pub mod error;
pub mod graph;
pub mod logging;
pub mod owl;
pub mod profiles;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult, ProfileError};
pub use graph::{Diagram, EdgeId, EdgeKind, Identity, Node, NodeId, NodeKind};
pub use logging::{LoggingConfig, init_logging};
pub use profiles::{Profile, ProfileKind, ValidationResult};
