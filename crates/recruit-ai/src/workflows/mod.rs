pub mod candidates;
pub mod validation_export;
