//! Shared helpers that do not belong to a pipeline stage.

pub mod test_helpers;
