use serde::Serialize;

use crate::table::filter::FilterSpec;

pub const EMAIL_SUBJECT: &str = "NEDC Filtered Projects Report";

/// Plain strings describing the current filtered view, for print and email hand-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub record_count: usize,
    pub filter_description: String,
}

impl ExportSummary {
    pub fn new(record_count: usize, spec: &FilterSpec) -> Self {
        Self {
            record_count,
            filter_description: spec.describe(),
        }
    }

    pub fn email_subject(&self) -> &'static str {
        EMAIL_SUBJECT
    }

    pub fn email_body(&self) -> String {
        let filters: Vec<String> = self
            .filter_description
            .lines()
            .map(|line| format!("- {line}"))
            .collect();
        format!(
            "Dear Recipient,\n\n\
             Please find attached the {EMAIL_SUBJECT} containing {} projects.\n\n\
             Applied Filters:\n{}\n\n\
             This report was generated from the NEDC Monitoring & Evaluation Database.\n\n\
             Best regards,\n\
             NEDC M&E Team\n",
            self.record_count,
            filters.join("\n"),
        )
    }

    pub fn mailto_link(&self) -> String {
        format!(
            "mailto:?subject={}&body={}",
            urlencoding::encode(self.email_subject()),
            urlencoding::encode(&self.email_body())
        )
    }
}
