use crate::domain::model::OutputFormat;
use crate::utils::error::{EtlError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 將格式名稱轉為 `OutputFormat`，並拒絕空清單與不支援的格式
pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<Vec<OutputFormat>> {
    if formats.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one output format is required".to_string(),
        });
    }

    formats
        .iter()
        .map(|name| {
            OutputFormat::from_name(name).ok_or_else(|| EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: name.clone(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    OutputFormat::ALL.map(|f| f.extension()).join(", ")
                ),
            })
        })
        .collect()
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| EtlError::MissingConfigError {
        field: field_name.to_string(),
    })
}
