//! Multi-document input: one file holding several schedules, each started by
//! a marker line such as `INPUT: week 12`.

use crate::core::pipeline::{read_lines, transform_documents, write_outputs};
use crate::core::{ConfigProvider, Document, Pipeline, Storage, TransformResult};
use crate::utils::error::Result;

pub const DEFAULT_INPUT_MARKER: &str = "INPUT:";

/// 依標記行切分文件。
///
/// Lines before the first marker form an unnamed document. Documents without
/// any lines are dropped. Each document records how many lines of the
/// combined stream precede its first line.
pub fn split_documents(lines: Vec<String>, marker: &str) -> Vec<Document> {
    let mut documents = Vec::new();
    let mut name: Option<String> = None;
    let mut current: Vec<String> = Vec::new();
    let mut offset = 0;

    for (i, line) in lines.into_iter().enumerate() {
        match line.strip_prefix(marker) {
            Some(rest) => {
                if !current.is_empty() {
                    documents.push(Document::new(name.take(), std::mem::take(&mut current), offset));
                } else if let Some(empty) = &name {
                    tracing::warn!("⚠️ Skipping empty document '{}'", empty);
                }
                name = Some(rest.trim().to_string());
                offset = i + 1;
            }
            None => current.push(line),
        }
    }

    if !current.is_empty() {
        documents.push(Document::new(name, current, offset));
    } else if let Some(empty) = &name {
        tracing::warn!("⚠️ Skipping empty document '{}'", empty);
    }

    documents
}

/// 多文件管道：每份文件獨立建立排班表，錯誤行號換算為整個輸入檔的絕對行號
pub struct MultiInputPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> MultiInputPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for MultiInputPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Document>> {
        let lines = read_lines(&self.storage, self.config.input_path()).await?;
        let documents = split_documents(lines, self.config.input_marker());
        tracing::debug!(
            "Split {} into {} document(s)",
            self.config.input_path(),
            documents.len()
        );
        Ok(documents)
    }

    async fn transform(&self, documents: Vec<Document>) -> Result<TransformResult> {
        transform_documents(&documents, self.config.skip_blank_lines())
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        write_outputs(&self.storage, &self.config, &result).await
    }
}
