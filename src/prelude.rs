/// Prelude module for datasets and the data model.
pub mod dataset_prelude;
/// Prelude module for decision tree induction and prediction.
pub mod machine_learning_prelude;
/// Prelude module for the numeric helpers.
pub mod math_prelude;

pub use dataset_prelude::*;
pub use machine_learning_prelude::*;
pub use math_prelude::*;
