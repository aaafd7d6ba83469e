pub mod capture_model;
pub mod extractor;
pub mod rules;
