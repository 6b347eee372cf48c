mod lookup_error;

pub use lookup_error::{LookupError, LookupErrorKind};
