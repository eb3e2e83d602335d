use chrono::Utc;
use serde::Serialize;

use crate::domain::model::{DocumentReport, OutputFormat, TransformResult};
use crate::utils::error::{EtlError, Result};

#[derive(Serialize)]
struct CsvRow<'a> {
    document: &'a str,
    first: &'a str,
    second: &'a str,
    coincidences: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    documents: &'a [DocumentReport],
}

/// 每組一行 `A-B: n`；多文件模式下每份文件前先輸出其名稱
pub fn render_txt(reports: &[DocumentReport]) -> String {
    let mut out = String::new();
    for report in reports {
        if let Some(name) = &report.name {
            out.push_str(name);
            out.push('\n');
        }
        for pair in &report.pairs {
            out.push_str(&format!("{}-{}: {}\n", pair.first, pair.second, pair.coincidences));
        }
    }
    out
}

pub fn render_csv(reports: &[DocumentReport]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    // 沒有任何資料列時 serde 不會寫出標頭，手動寫入
    writer.write_record(["document", "first", "second", "coincidences"])?;
    for report in reports {
        for pair in &report.pairs {
            writer.serialize(CsvRow {
                document: report.name.as_deref().unwrap_or(""),
                first: &pair.first,
                second: &pair.second,
                coincidences: pair.coincidences,
            })?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("Failed to flush CSV output: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

pub fn render_json(reports: &[DocumentReport]) -> Result<String> {
    let report = JsonReport {
        generated_at: Utc::now().to_rfc3339(),
        documents: reports,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Render every format at once; the pipelines pick what the config asks for.
pub fn render_all(reports: Vec<DocumentReport>) -> Result<TransformResult> {
    let txt_output = render_txt(&reports);
    let csv_output = render_csv(&reports)?;
    let json_output = render_json(&reports)?;
    Ok(TransformResult {
        reports,
        txt_output,
        csv_output,
        json_output,
    })
}

impl TransformResult {
    pub fn output(&self, format: OutputFormat) -> &str {
        match format {
            OutputFormat::Txt => &self.txt_output,
            OutputFormat::Csv => &self.csv_output,
            OutputFormat::Json => &self.json_output,
        }
    }

    pub fn pair_count(&self) -> usize {
        self.reports.iter().map(|r| r.pairs.len()).sum()
    }
}
