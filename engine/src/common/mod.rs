pub mod errors;

pub use errors::{ErrorContext, StoreError, ThemeError};
