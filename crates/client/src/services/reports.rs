use academia_core::StudentId;

use super::Api;
use crate::error::ClientError;
use crate::transport::ApiRequest;

/// A downloaded report with the filename it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ReportService {
    api: Api,
}

impl ReportService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// Grade transcript as a PDF, named after `display_name`.
    pub async fn student_report_pdf(&self, student: StudentId, display_name: &str) -> Result<ReportDocument, ClientError> {
        let response = self
            .api
            .execute(ApiRequest::get(format!("/api/reports/student/{student}/pdf")))
            .await?;
        if response.body.is_empty() {
            return Err(ClientError::MalformedResponse("empty report body".into()));
        }

        Ok(ReportDocument {
            filename: report_filename(display_name),
            bytes: response.body,
        })
    }
}

/// `Grades_Report_<name>.pdf`, with characters unsafe in filenames replaced.
pub fn report_filename(display_name: &str) -> String {
    let name: String = display_name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let name = if name.is_empty() { "student".to_string() } else { name };
    format!("Grades_Report_{name}.pdf")
}
