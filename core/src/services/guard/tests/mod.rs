//! Tests for the origin guard
