use crate::domain::model::{Document, OutputFormat, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_formats(&self) -> Vec<OutputFormat>;
    /// 指定格式的輸出檔路徑 (相對於 Storage)
    fn output_file(&self, format: OutputFormat) -> String;
    fn multiple_inputs(&self) -> bool;
    fn input_marker(&self) -> &str;
    fn skip_blank_lines(&self) -> bool;
    /// Path of a zip archive bundling every output, when compression is on.
    fn archive_file(&self) -> Option<String> {
        None
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Document>>;
    async fn transform(&self, documents: Vec<Document>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
