pub mod types;
pub mod validation;
pub mod test_helpers;
