//! Input sanitation, structural validation and fraud scoring.

pub mod fraud;
pub mod sanitizer;
pub mod validator;

pub use fraud::FraudScorer;
pub use sanitizer::sanitize;
pub use validator::SecurityValidator;
