//! Severity scoring for IT tickets.
//!
//! Takes an embedding to a calibrated 10-100 severity score and a category:
//!
//! - [`Regressor`] produces a raw score; [`RegressorModel`] is the JSON form
//!   of the shipped linear or forest model
//! - [`SeverityScaler`] maps raw scores onto the severity range
//! - [`CategoryScheme`] turns a calibrated score into a [`SeverityCategory`]
//!
//! Nothing here touches text; the embedding crate owns that side.

mod category;
mod config;
mod error;
mod regressor;
mod scaler;

pub use crate::category::{CategoryScheme, SeverityCategory};
pub use crate::config::{population_variance, ScoringConfig};
pub use crate::error::ScoringError;
pub use crate::regressor::{
    DecisionTree, ForestModel, LinearModel, Regressor, RegressorInfo, RegressorModel, TreeNode,
};
pub use crate::scaler::{
    remap, CategoryShare, ScalerInfo, SeverityScaler, DEFAULT_MAX_SCORE, DEFAULT_MIN_SCORE,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regress_scale_categorize() {
        let model = RegressorModel::Linear(LinearModel {
            weights: vec![1.0, 1.0],
            intercept: 0.0,
        });
        let mut scaler = SeverityScaler::default();
        scaler.fit(&[0.0, 1.0]).unwrap();

        let raw = model.predict(&[0.5, 0.5]).unwrap();
        let score = scaler.score(raw).unwrap();
        assert_eq!(score, 100.0);
        assert_eq!(
            CategoryScheme::ThreeBand.categorize(score),
            SeverityCategory::High
        );

        let raw = model.predict(&[0.0, 0.0]).unwrap();
        let score = scaler.score(raw).unwrap();
        assert_eq!(score, 10.0);
        assert_eq!(
            CategoryScheme::ThreeBand.categorize(score),
            SeverityCategory::Low
        );
    }
}
