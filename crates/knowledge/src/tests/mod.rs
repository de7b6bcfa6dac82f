//! Scenario tests for the query handler.

mod support;
