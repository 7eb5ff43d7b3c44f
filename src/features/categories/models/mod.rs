mod category;

pub use category::{Category, CategoryChanges, CategoryStatus, NewCategory};
