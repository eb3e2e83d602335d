pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::core::{
    coincidence::{count_coincidences, run, Coincidences},
    etl::EtlEngine,
    parser::read_schedule,
    pipeline::SimplePipeline,
    pipeline_sequence::{split_documents, MultiInputPipeline},
    schedule::{add_timeframe, read_schedules, ScheduleRegistry},
    timeframe::{meet, meet_in_day, TimeWindow},
};
pub use domain::model::{OutputFormat, PairCoincidence, Timeframe};
pub use utils::error::{EtlError, Result};
