pub mod gaussian_nb;
pub mod params;

pub use gaussian_nb::{check_features, fit, fit_with_config, predict, Prediction};
pub use params::{
    gaussian_density, ClassPriors, FeatureStats, GaussianParams, Model, BINARY_CLASSES,
    NEGATIVE_CLASS, POSITIVE_CLASS,
};
