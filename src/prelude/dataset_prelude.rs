pub use crate::dataset::weather::load_weather;
pub use crate::dataset::{Attribute, AttributeKind, Dataset, MISSING};
