//! Medical report upload and analysis

use crate::auth_client::ApiClient;
use crate::error::{ClientError, Result};
use crate::request::{ApiRequest, MultipartFile};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Multipart field the backend reads the upload from
pub const REPORT_FIELD: &str = "report_file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Pdf,
    Png,
    Jpeg,
}

impl ReportKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub fn is_image(&self) -> bool {
        !matches!(self, Self::Pdf)
    }
}

/// A lab report ready to upload
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub file_name: String,
    pub kind: ReportKind,
    pub data: Vec<u8>,
}

impl ReportFile {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let kind = Path::new(&file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ReportKind::from_extension)
            .ok_or_else(|| {
                ClientError::Validation(format!("{file_name}: upload a PDF, PNG or JPEG report."))
            })?;

        if data.is_empty() {
            return Err(ClientError::Validation(format!("{file_name} is empty.")));
        }

        Ok(Self { file_name, kind, data })
    }

    /// Read a report from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ClientError::Validation(format!("{} is not a file", path.display())))?
            .to_string();

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::Validation(format!("Cannot read {}: {e}", path.display())))?;

        Self::new(file_name, data)
    }

    fn to_multipart(&self) -> MultipartFile {
        MultipartFile {
            field: REPORT_FIELD.to_string(),
            file_name: self.file_name.clone(),
            mime: self.kind.mime().to_string(),
            data: self.data.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct AnalysisResponse {
    analysis: String,
}

impl ApiClient {
    /// Upload a report and return the backend's markdown analysis
    pub async fn analyze_report(&self, report: &ReportFile) -> Result<String> {
        let response: AnalysisResponse = self
            .json(ApiRequest::post("/reports/analyze/").file(report.to_multipart()))
            .await?;
        info!(
            file_name = %report.file_name,
            bytes = %report.data.len(),
            "Report analyzed"
        );
        Ok(response.analysis)
    }
}
