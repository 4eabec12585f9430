pub mod catalog;
pub mod recommendation;
pub mod shared_catalog;

pub use catalog::Catalog;
pub use recommendation::{Prediction, PredictionBasis};
pub use shared_catalog::SharedCatalog;
