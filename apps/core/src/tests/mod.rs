//! Test Module
//!
//! Cross-module test suite for the email classifier.
//!
//! ## Test Categories
//! - `brain_tests`: end-to-end classification scenarios and core properties
//! - `supervisor_tests`: intake validation, failover and file uploads
//! - `text_extract_tests`: TXT and PDF extraction
//! - `chaos_test`: concurrency and resilience under failing backends
//! - `mock_llm`: scripted language-model backends shared by the tests

pub mod brain_tests;
