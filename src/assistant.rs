//! Query Responder and Report Summarizer: fixed instruction templates
//! around the user's text, delegated to the completion service.

use std::sync::Arc;

use crate::completion::CompletionService;
use crate::error::Result;

const HEALTHCARE_PREAMBLE: &str =
    "You are a healthcare assistant trained to provide information and assistance \
     strictly related to healthcare.";

const LAB_REPORT_PREAMBLE: &str =
    "You are a medical assistant specialized in summarizing lab test reports.";

/// Forwards a free-text health query to the completion service, wrapped in
/// the restrictive healthcare template. No guard on empty input; an empty
/// query simply produces a reply to an empty prompt.
#[derive(Clone)]
pub struct QueryResponder {
    completion: Arc<dyn CompletionService>,
}

impl QueryResponder {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    pub async fn respond(&self, query: &str) -> Result<String> {
        let prompt = format!(
            "User's Query: {query}\n\
             Your Response:"
        );
        self.completion.complete(HEALTHCARE_PREAMBLE, &prompt).await
    }
}

/// Summarizes extracted lab report text with the six-point guidance
/// template. The extracted text is embedded verbatim and not stored after
/// the summary is produced.
#[derive(Clone)]
pub struct ReportSummarizer {
    completion: Arc<dyn CompletionService>,
}

impl ReportSummarizer {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    pub async fn summarize(&self, text: &str) -> Result<String> {
        let prompt = format!(
            "Guidelines:\n\
             1. Summarize the key points of the lab test report provided.\n\
             2. Highlight any significant results or abnormalities and their potential implications.\n\
             3. Clearly mention the test results, the normal reference range, and whether the results fall within or outside this range.\n\
             4. Use clear, concise, and easy-to-understand language.\n\
             5. Provide general suggestions on what these results could indicate, but avoid making a medical diagnosis.\n\
             6. Encourage consulting a doctor or healthcare professional for a detailed interpretation and next steps.\n\
             \n\
             Lab Report Content:\n\
             {text}\n\
             \n\
             Summary:"
        );
        self.completion.complete(LAB_REPORT_PREAMBLE, &prompt).await
    }
}
