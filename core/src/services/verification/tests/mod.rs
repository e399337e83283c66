//! Tests for the verification engine and service

#[cfg(test)]
mod mocks;
