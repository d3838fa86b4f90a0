pub mod delimited;
pub mod model_store;

pub use delimited::{
    frame_from_records, read_frame, read_frame_with_config, write_predictions, ReaderConfig,
};
pub use model_store::{load_model, save_model};
