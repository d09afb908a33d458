//! Integration tests for Sumi-Linkcheck
//!
//! These tests use wiremock to stand up local sites and run real crawls and
//! fetches against them.

mod crawl_tests;
