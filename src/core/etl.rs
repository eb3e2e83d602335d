use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting schedule processing...");

        // Extract
        tracing::info!("Reading input...");
        let documents = self.pipeline.extract().await?;
        let line_count: usize = documents.iter().map(|d| d.lines.len()).sum();
        tracing::info!("Read {} document(s), {} line(s)", documents.len(), line_count);
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("Merging schedules and counting coincidences...");
        let result = self.pipeline.transform(documents).await?;
        tracing::info!("Computed {} pair result(s)", result.pair_count());
        self.monitor.log_stats("Transform");

        // Load
        tracing::info!("Writing output...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
