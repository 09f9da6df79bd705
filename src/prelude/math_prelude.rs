pub use crate::math::{SMALL, approx_eq, max_index, normalize, split_information};
