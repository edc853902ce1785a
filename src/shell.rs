//! Page shell: the form, the current summary and the page chrome.

use crate::client::{ClientError, SummaryClient};
use crate::display::SummaryDisplay;
use crate::form::SummaryForm;
use chrono::Datelike;

/// Title shown in the header and footer
pub const APP_TITLE: &str = "Website Summarizer";

/// Owns the summary passed from the form to the display.
#[derive(Debug, Clone, Default)]
pub struct PageShell {
    pub form: SummaryForm,
    summary: String,
}

impl PageShell {
    pub fn new(form: SummaryForm) -> Self {
        Self {
            form,
            summary: String::new(),
        }
    }

    /// The latest successful summary, empty until the first one arrives
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Replace the current summary
    pub fn set_summary(&mut self, summary: String) {
        self.summary = summary;
    }

    /// Display for the current summary, `None` while it is empty
    pub fn display(&self) -> Option<SummaryDisplay> {
        SummaryDisplay::from_summary(&self.summary)
    }

    /// Apply a finished request; only a success replaces the summary
    pub fn apply(&mut self, result: Result<String, ClientError>) {
        if let Some(summary) = self.form.finish_submit(result) {
            self.set_summary(summary);
        }
    }

    /// Submit the form and wait for the result
    pub async fn submit(&mut self, client: &SummaryClient) {
        if let Some(summary) = self.form.submit(client).await {
            self.set_summary(summary);
        }
    }

    pub fn header_text(&self) -> &'static str {
        APP_TITLE
    }

    pub fn footer_text(&self, year: i32) -> String {
        format!("© {} {}", year, APP_TITLE)
    }

    /// The page as a standalone HTML document
    pub fn render_page(&self, year: i32) -> String {
        let mut page = String::new();
        page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        page.push_str(&format!("<title>{}</title>\n</head>\n<body>\n", APP_TITLE));
        page.push_str(&format!(
            "<header>\n<h1>{}</h1>\n</header>\n<main>\n",
            self.header_text()
        ));
        if let Some(display) = self.display() {
            page.push_str(&display.html());
        }
        page.push_str(&format!(
            "</main>\n<footer>{}</footer>\n</body>\n</html>\n",
            self.footer_text(year)
        ));
        page
    }
}

/// The current calendar year in local time
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}
