//! Summary form state and submission flow.
//!
//! The form owns the raw inputs and the loading/error state. Submission is
//! split into [`SummaryForm::begin_submit`] and [`SummaryForm::finish_submit`]
//! so the TUI can run the request on a background task; [`SummaryForm::submit`]
//! does both around a single awaited call.

use crate::client::{ClientError, SummaryClient};
use crate::config::DefaultsConfig;
use crate::summary::{SummaryLength, SummaryRequest, SummaryStyle};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please provide either a URL or some text.")]
    MissingInput,
}

/// Local input state of the summary form.
#[derive(Debug, Clone, Default)]
pub struct SummaryForm {
    url: String,
    text: String,
    length: SummaryLength,
    style: SummaryStyle,
    loading: bool,
    error: Option<String>,
}

impl SummaryForm {
    pub fn new(length: SummaryLength, style: SummaryStyle) -> Self {
        Self {
            length,
            style,
            ..Self::default()
        }
    }

    pub fn from_defaults(defaults: &DefaultsConfig) -> Self {
        Self::new(defaults.length, defaults.style)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn length(&self) -> SummaryLength {
        self.length
    }

    pub fn style(&self) -> SummaryStyle {
        self.style
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message currently shown under the form, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The URL input is disabled while text is entered
    pub fn url_enabled(&self) -> bool {
        self.text.is_empty()
    }

    /// The text input is disabled while a URL is entered
    pub fn text_enabled(&self) -> bool {
        self.url.is_empty()
    }

    /// Replace the URL input. Returns false and leaves the form untouched when
    /// the control is disabled.
    pub fn set_url(&mut self, url: impl Into<String>) -> bool {
        if !self.url_enabled() {
            return false;
        }
        self.url = url.into();
        true
    }

    /// Replace the text input. Returns false and leaves the form untouched when
    /// the control is disabled.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        if !self.text_enabled() {
            return false;
        }
        self.text = text.into();
        true
    }

    pub fn set_length(&mut self, length: SummaryLength) {
        self.length = length;
    }

    pub fn set_style(&mut self, style: SummaryStyle) {
        self.style = style;
    }

    pub fn cycle_length(&mut self) {
        self.length = self.length.next();
    }

    pub fn cycle_style(&mut self) {
        self.style = self.style.next();
    }

    /// Build the request body, or fail when neither input is filled in
    pub fn validate(&self) -> Result<SummaryRequest, FormError> {
        if self.url.is_empty() && self.text.is_empty() {
            return Err(FormError::MissingInput);
        }
        Ok(SummaryRequest::new(
            &self.url,
            &self.text,
            self.length,
            self.style,
        ))
    }

    /// Start a submission.
    ///
    /// Returns the request to send, having entered the loading state. Returns
    /// `None` when a request is already in flight, or when validation failed
    /// (the validation message is then set and nothing should be sent).
    pub fn begin_submit(&mut self) -> Option<SummaryRequest> {
        if self.loading {
            debug!("submission ignored, request already in flight");
            return None;
        }

        self.error = None;
        match self.validate() {
            Ok(request) => {
                self.loading = true;
                Some(request)
            }
            Err(e) => {
                debug!("form validation failed: {}", e);
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Apply the outcome of a request started with [`Self::begin_submit`].
    ///
    /// Returns the summary to hand to the page on success.
    pub fn finish_submit(&mut self, result: Result<String, ClientError>) -> Option<String> {
        self.loading = false;
        match result {
            Ok(summary) => {
                info!(summary_len = summary.len(), "summary received");
                self.error = None;
                Some(summary)
            }
            Err(e) => {
                warn!("summary request failed: {}", e);
                self.error = Some(e.user_message());
                None
            }
        }
    }

    /// Validate, send and apply the result in one go
    pub async fn submit(&mut self, client: &SummaryClient) -> Option<String> {
        let request = self.begin_submit()?;
        let result = client.summarize(&request).await;
        self.finish_submit(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::GENERIC_ERROR;

    const VALIDATION_MESSAGE: &str = "Please provide either a URL or some text.";

    #[test]
    fn empty_form_fails_validation() {
        let mut form = SummaryForm::default();

        assert_eq!(form.validate(), Err(FormError::MissingInput));
        assert!(form.begin_submit().is_none());
        assert_eq!(form.error(), Some(VALIDATION_MESSAGE));
        assert!(!form.is_loading());
    }

    #[test]
    fn url_disables_text_without_clearing() {
        let mut form = SummaryForm::default();
        assert!(form.set_url("https://example.com"));

        assert!(form.url_enabled());
        assert!(!form.text_enabled());
        assert!(!form.set_text("ignored"));
        assert_eq!(form.text(), "");

        // Clearing the url re-enables text
        assert!(form.set_url(""));
        assert!(form.text_enabled());
        assert!(form.set_text("now allowed"));
        assert!(!form.url_enabled());
        assert_eq!(form.text(), "now allowed");
    }

    #[test]
    fn mutual_exclusion_holds_for_any_edit_sequence() {
        let edits: [(bool, &str); 6] = [
            (true, "a"),
            (false, "b"),
            (true, ""),
            (false, "c"),
            (true, "d"),
            (false, ""),
        ];

        // Start the edit sequence at each offset
        for start in 0..edits.len() {
            let mut form = SummaryForm::default();
            for (is_url, value) in edits.iter().cycle().skip(start).take(edits.len() * 2) {
                if *is_url {
                    form.set_url(*value);
                } else {
                    form.set_text(*value);
                }
                assert!(form.url().is_empty() || form.text().is_empty());
                assert!(form.url_enabled() || form.text_enabled());
                assert_eq!(form.url_enabled(), form.text().is_empty());
                assert_eq!(form.text_enabled(), form.url().is_empty());
            }
        }
    }

    #[test]
    fn begin_submit_builds_request_and_blocks_reentry() {
        let mut form = SummaryForm::new(SummaryLength::Short, SummaryStyle::BulletPoints);
        form.set_text("hello");

        let request = form.begin_submit().unwrap();
        assert_eq!(request.url, None);
        assert_eq!(request.text.as_deref(), Some("hello"));
        assert_eq!(request.length, 1);
        assert_eq!(request.summary_style, SummaryStyle::BulletPoints);
        assert!(form.is_loading());

        assert!(form.begin_submit().is_none());
    }

    #[test]
    fn successful_finish_clears_error_and_loading() {
        let mut form = SummaryForm::default();
        form.begin_submit();
        assert!(form.error().is_some());

        form.set_url("https://example.com");
        form.begin_submit().unwrap();
        let summary = form.finish_submit(Ok("# Hi".to_string()));

        assert_eq!(summary.as_deref(), Some("# Hi"));
        assert_eq!(form.error(), None);
        assert!(!form.is_loading());
    }

    #[test]
    fn failed_finish_sets_message_and_resets_loading() {
        let mut form = SummaryForm::default();
        form.set_url("https://example.com");
        form.begin_submit().unwrap();

        let summary = form.finish_submit(Err(ClientError::Decode("eof".to_string())));

        assert!(summary.is_none());
        assert_eq!(form.error(), Some(GENERIC_ERROR));
        assert!(!form.is_loading());
        // Form stays usable
        assert!(form.begin_submit().is_some());
    }

    #[test]
    fn selectors_cycle() {
        let mut form = SummaryForm::default();
        assert_eq!(form.length(), SummaryLength::Long);
        form.cycle_length();
        assert_eq!(form.length(), SummaryLength::Short);
        form.cycle_style();
        assert_eq!(form.style(), SummaryStyle::BulletPoints);
        form.set_length(SummaryLength::Medium);
        form.set_style(SummaryStyle::Detailed);
        assert_eq!(form.validate().unwrap_err(), FormError::MissingInput);
    }
}
