pub mod metrics;
pub mod tags;

pub use metrics::{prediction_lines, write_predictions, Evaluation, Report, Scores, PREDICTION_FILE};
pub use tags::{bio_to_bioes, bioes_to_bio, chunks, Chunk, Tag, TagPrefix, TagScheme};
