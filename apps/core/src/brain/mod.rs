//! # Brain Module
//!
//! Classification core. Everything here is synchronous and pure except the
//! single language-model call made by the classifier.
//!
//! ## Components
//! - `json_repair`: strips fences from model output and parses it
//! - `scorer`: keyword and pattern scoring of the email text
//! - `adjuster`: rule-based confidence post-processing
//! - `prompt`: prompt construction and truncation
//! - `classifier`: main orchestrator

pub mod adjuster;
pub mod classifier;
pub mod json_repair;
pub mod prompt;
pub mod scorer;

// Re-export main types for convenience
#[allow(unused_imports)]
pub use adjuster::{adjust, Adjustment, Rule};
pub use classifier::EmailClassifier;
#[allow(unused_imports)]
pub use json_repair::{repair, ParsedResponse};
#[allow(unused_imports)]
pub use scorer::{score, ScoreVector};
