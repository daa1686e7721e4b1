//! End-to-end scenarios and property tests for the expression engine.
