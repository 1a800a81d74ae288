//! Foundation utilities shared by every siteforge crate.
//!
//! Holds the error taxonomy, the tracing setup, the bounded ring buffer used by
//! the design history, secret redaction for log output, and the data types that
//! cross crate boundaries (intent manifests, generated files, task categories).

pub mod error;
pub mod logging;
pub mod redaction;
pub mod ring_buffer;
pub mod types;

pub use error::{
    ConfigError, ErrorCategory, GenerationError, LogError, ProviderError, UserFriendlyError,
    WireError,
};
pub use ring_buffer::RingBuffer;
pub use types::{Audience, ConfigSource, GeneratedFile, IntentManifest, TaskCategory};
