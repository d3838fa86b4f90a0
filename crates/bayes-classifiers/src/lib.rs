//! bayes-classifiers: Gaussian Naive Bayes for binary, integer-coded tables.
//!
//! The statistical core is `data_handling` (train/test split), `models`
//! (estimation and prediction) and `evaluation` (confusion counts and
//! metrics). Around it sit the collaborators: `preprocessing` for turning raw
//! text into integers, `io` for delimited files and model persistence, and
//! `report` for text rendering.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod evaluation;
pub mod frame;
pub mod io;
pub mod models;
pub mod preprocessing;
pub mod report;

pub use error::{ClassifierError, ErrorKind, Result};
pub use frame::{Frame, Sample};
