pub mod constants;
pub mod errors;
pub mod services;

pub use errors::{LookupError, LookupErrorKind};
pub use services::context::{LookupContext, LookupValue, MemoryContext};
pub use services::logger::Logger;
pub use services::lookup::{ConsulLookup, LookupOutcome, NODE_SENTINEL_PREFIX};
pub use services::options::{FailureMode, LookupOptions};
