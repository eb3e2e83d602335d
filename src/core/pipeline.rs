use crate::core::render::render_all;
use crate::core::schedule::ScheduleRegistry;
use crate::core::{ConfigProvider, Document, Pipeline, Storage, TransformResult};
use crate::domain::model::DocumentReport;
use crate::utils::error::{EtlError, Result};
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

/// 單一輸入文件的管道：整個輸入檔就是一份排班資料
pub struct SimplePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> SimplePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SimplePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Document>> {
        let lines = read_lines(&self.storage, self.config.input_path()).await?;
        tracing::debug!("Read {} line(s) from {}", lines.len(), self.config.input_path());
        Ok(vec![Document::new(None, lines, 0)])
    }

    async fn transform(&self, documents: Vec<Document>) -> Result<TransformResult> {
        transform_documents(&documents, self.config.skip_blank_lines())
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        write_outputs(&self.storage, &self.config, &result).await
    }
}

/// Read a file and split it into lines, stripping `\n` and `\r\n`.
///
/// A line that is not valid UTF-8 is reported as corrupted input with its
/// 1-based line number.
pub async fn read_lines<S: Storage>(storage: &S, path: &str) -> Result<Vec<String>> {
    let bytes = storage.read_file(path).await?;
    decode_lines(&bytes)
}

pub fn decode_lines(bytes: &[u8]) -> Result<Vec<String>> {
    let mut raw_lines: Vec<&[u8]> = bytes.split(|b| *b == b'\n').collect();
    if raw_lines.last().is_some_and(|last| last.is_empty()) {
        raw_lines.pop();
    }

    raw_lines
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            String::from_utf8(raw.to_vec()).map_err(|_| {
                let text = String::from_utf8_lossy(raw);
                EtlError::corrupted(text.as_ref()).at_line(i + 1, &text)
            })
        })
        .collect()
}

/// 處理單一文件：建立排班表並計算所有兩兩組合
pub fn process_document(document: &Document, skip_blank_lines: bool) -> Result<DocumentReport> {
    let numbered = document
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| (i + 1, line.as_str()))
        .filter(|(_, line)| !(skip_blank_lines && line.trim().is_empty()));

    let registry = ScheduleRegistry::from_numbered_lines(numbered)
        .map_err(|e| e.offset_line(document.line_offset))?;

    let pairs: Vec<_> = registry.coincidences().collect();
    tracing::debug!(
        "Document {:?}: {} people, {} pair(s)",
        document.name,
        registry.len(),
        pairs.len()
    );

    Ok(DocumentReport {
        name: document.name.clone(),
        people: registry.len(),
        pairs,
    })
}

/// Process every document; the first invalid line aborts the whole batch.
pub fn transform_documents(documents: &[Document], skip_blank_lines: bool) -> Result<TransformResult> {
    let reports = documents
        .iter()
        .map(|document| process_document(document, skip_blank_lines))
        .collect::<Result<Vec<_>>>()?;
    render_all(reports)
}

/// 依設定寫出各格式檔案，或打包成單一 ZIP
pub async fn write_outputs<S: Storage, C: ConfigProvider>(
    storage: &S,
    config: &C,
    result: &TransformResult,
) -> Result<String> {
    let formats = config.output_formats();

    if let Some(archive) = config.archive_file() {
        tracing::debug!("Creating ZIP file with {} files", formats.len());

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for format in &formats {
                let path = config.output_file(*format);
                let entry = Path::new(&path)
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or(format.extension())
                    .to_string();
                zip.start_file::<_, ()>(entry, FileOptions::default())?;
                zip.write_all(result.output(*format).as_bytes())?;
            }
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        storage.write_file(&archive, &zip_data).await?;
        return Ok(archive);
    }

    let mut written = Vec::new();
    for format in formats {
        let path = config.output_file(format);
        storage
            .write_file(&path, result.output(format).as_bytes())
            .await?;
        tracing::debug!("Wrote {} output to {}", format.extension(), path);
        written.push(path);
    }
    Ok(written.join(", "))
}
