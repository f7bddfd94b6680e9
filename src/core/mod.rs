//! Core business logic abstractions

pub mod config;
pub mod convert;
pub mod currency;
pub mod log;
pub mod rates;
pub mod service;

// Re-export main types for cleaner imports
pub use convert::{Conversion, ConversionError};
pub use currency::RateProvider;
pub use rates::{RateStore, RateTable};
pub use service::RateService;
