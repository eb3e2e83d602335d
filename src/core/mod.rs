pub mod coincidence;
pub mod etl;
pub mod parser;
pub mod pipeline;
pub mod pipeline_sequence;
pub mod render;
pub mod schedule;
pub mod timeframe;

pub use crate::domain::model::{Document, Timeframe, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
