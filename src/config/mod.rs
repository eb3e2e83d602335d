pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use crate::core::pipeline_sequence::DEFAULT_INPUT_MARKER;
    use crate::core::ConfigProvider;
    use crate::domain::model::OutputFormat;
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
    use clap::Parser;
    use std::path::Path;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "schedule-etl")]
    #[command(about = "Count overlapping weekly availability windows for every pair of people")]
    pub struct CliConfig {
        /// Input file, one `NAME=DDhh:mm-hh:mm,...` line per schedule
        #[arg(short, long, default_value = "INPUT.txt")]
        pub input: String,

        /// Output file; its extension is replaced per format when several are requested
        #[arg(short, long, default_value = "OUTPUT.txt")]
        pub output: String,

        #[arg(short, long, value_enum, value_delimiter = ',', default_value = "txt")]
        pub format: Vec<OutputFormat>,

        /// Treat the input as several documents separated by marker lines
        #[arg(long)]
        pub multiple_inputs: bool,

        #[arg(long, default_value = DEFAULT_INPUT_MARKER)]
        pub input_marker: String,

        #[arg(long, help = "Ignore blank lines instead of rejecting them")]
        pub skip_blank_lines: bool,

        /// Bundle every output file into this zip archive
        #[arg(long)]
        pub archive: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_formats(&self) -> Vec<OutputFormat> {
            let mut formats = Vec::new();
            for format in &self.format {
                if !formats.contains(format) {
                    formats.push(*format);
                }
            }
            formats
        }

        fn output_file(&self, format: OutputFormat) -> String {
            if self.output_formats().len() <= 1 {
                return self.output.clone();
            }
            Path::new(&self.output)
                .with_extension(format.extension())
                .to_string_lossy()
                .into_owned()
        }

        fn multiple_inputs(&self) -> bool {
            self.multiple_inputs
        }

        fn input_marker(&self) -> &str {
            &self.input_marker
        }

        fn skip_blank_lines(&self) -> bool {
            self.skip_blank_lines
        }

        fn archive_file(&self) -> Option<String> {
            self.archive.clone()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("input", &self.input)?;
            validate_path("output", &self.output)?;
            if self.multiple_inputs {
                validate_non_empty_string("input_marker", &self.input_marker)?;
            }
            if let Some(archive) = &self.archive {
                validate_path("archive", archive)?;
            }
            Ok(())
        }
    }

}
