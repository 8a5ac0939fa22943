//! Shared test fixtures and cross-module scenarios.


mod integration_test;
