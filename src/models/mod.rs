//! Regression models for demand forecasting.
//!
//! Two interchangeable ensemble strategies are provided behind the
//! [`Regressor`] trait: gradient-boosted trees and random-forest trees.

pub mod gradient_boosting;
pub mod random_forest;
mod tree;
pub mod traits;

pub use gradient_boosting::GradientBoostingRegressor;
pub use random_forest::RandomForestRegressor;
pub use traits::{Algorithm, BoxedRegressor, Regressor};
