//! Integration tests for Site-Text
//!
//! These tests use wiremock to create mock HTTP servers and run whole
//! batches end-to-end against temporary output directories.

mod scrape_tests;
