use serde::{Deserialize, Serialize};

/// 一個可用時段：星期 (0 = 週一 … 6 = 週日) 與當天的起訖分鐘數。
///
/// `0 <= start <= finish <= 1440`；`1440` 代表當天結束的午夜。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timeframe {
    pub day: u8,
    pub start: u16,
    pub finish: u16,
}

/// Number of meeting timeframe pairs between two people.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairCoincidence {
    pub first: String,
    pub second: String,
    pub coincidences: usize,
}

impl PairCoincidence {
    /// True when this result describes the unordered pair `{a, b}`.
    pub fn is_pair(&self, a: &str, b: &str) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

/// 待處理的輸入文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// `None` for a plain single-document input.
    pub name: Option<String>,
    pub lines: Vec<String>,
    /// 第一行之前已消耗的行數，用於換算絕對行號
    pub line_offset: usize,
}

impl Document {
    pub fn new(name: Option<String>, lines: Vec<String>, line_offset: usize) -> Self {
        Self {
            name,
            lines,
            line_offset,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub name: Option<String>,
    pub people: usize,
    pub pairs: Vec<PairCoincidence>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub reports: Vec<DocumentReport>,
    pub txt_output: String,
    pub csv_output: String,
    pub json_output: String,
}

/// 輸出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `NAME_A-NAME_B: COUNT` lines
    Txt,
    Csv,
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Txt, OutputFormat::Csv, OutputFormat::Json];

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(name))
    }
}
