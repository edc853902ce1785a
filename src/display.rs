//! Summary display: sanitized HTML for a summary, and its terminal rendering.

use crate::markdown::{render_markdown, sanitize_html};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use scraper::{ElementRef, Html, Node};

/// Heading shown above every summary
pub const HEADING: &str = "Summary:";

/// A non-empty summary, rendered and sanitized.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryDisplay {
    fragment: String,
}

impl SummaryDisplay {
    /// Render a summary. An empty summary has nothing to display.
    pub fn from_summary(summary: &str) -> Option<Self> {
        if summary.is_empty() {
            return None;
        }
        let raw = render_markdown(summary);
        let fragment = sanitize_html(&raw);
        Some(Self { fragment })
    }

    /// The sanitized fragment without its container
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// The bordered summary card
    pub fn html(&self) -> String {
        format!(
            "<section class=\"card\">\n<h2>{}</h2>\n<div class=\"prose\">\n{}</div>\n</section>\n",
            HEADING, self.fragment
        )
    }

    /// Terminal lines for the sanitized fragment
    pub fn lines(&self) -> Vec<Line<'static>> {
        let document = Html::parse_fragment(&self.fragment);
        let mut writer = LineWriter::default();
        writer.walk(document.root_element(), Style::default(), 0);
        writer.finish()
    }

    /// Unstyled text, one entry per terminal line
    pub fn plain_text(&self) -> String {
        self.lines()
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Default)]
struct LineWriter {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
}

impl LineWriter {
    fn push(&mut self, text: impl Into<String>, style: Style) {
        self.current.push(Span::styled(text.into(), style));
    }

    fn flush(&mut self) {
        if let Some(last) = self.current.last_mut() {
            last.content = last.content.trim_end().to_string().into();
        }
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    /// End the current block, leaving a single blank line after it
    fn end_block(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|line| !line.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|line| line.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }

    fn walk(&mut self, element: ElementRef<'_>, style: Style, depth: usize) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.text(text, style),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.element(child, style, depth);
                    }
                }
                _ => {}
            }
        }
    }

    fn text(&mut self, text: &str, style: Style) {
        // Whitespace between block tags
        if self.current.is_empty() && text.trim().is_empty() {
            return;
        }
        let text = text.replace('\n', " ");
        let text = if self.current.is_empty() {
            text.trim_start().to_string()
        } else {
            text
        };
        self.push(text, style);
    }

    fn element(&mut self, element: ElementRef<'_>, style: Style, depth: usize) {
        match element.value().name() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.end_block();
                let heading = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
                let heading = if element.value().name() == "h1" {
                    heading.add_modifier(Modifier::UNDERLINED)
                } else {
                    heading
                };
                self.walk(element, heading, depth);
                self.end_block();
            }
            "p" => {
                self.walk(element, style, depth);
                if depth == 0 {
                    self.end_block();
                } else {
                    self.flush();
                }
            }
            "ul" | "ol" => {
                self.flush();
                self.list(element, style, depth);
                if depth == 0 {
                    self.end_block();
                }
            }
            "pre" => {
                self.end_block();
                let code: String = element.text().collect();
                for line in code.trim_end_matches('\n').lines() {
                    self.push(format!("    {}", line), style.fg(Color::Yellow));
                    self.flush();
                }
                self.end_block();
            }
            "blockquote" => {
                self.end_block();
                self.walk(element, style.fg(Color::DarkGray).add_modifier(Modifier::ITALIC), depth);
                self.end_block();
            }
            "hr" => {
                self.end_block();
                self.push("─".repeat(40), style.fg(Color::DarkGray));
                self.end_block();
            }
            "br" => self.flush(),
            "tr" => {
                let cells: Vec<String> = element
                    .children()
                    .filter_map(ElementRef::wrap)
                    .map(|cell| cell.text().collect::<String>().trim().to_string())
                    .collect();
                let row_style = if is_header_row(element) {
                    style.add_modifier(Modifier::BOLD)
                } else {
                    style
                };
                self.push(cells.join(" │ "), row_style);
                self.flush();
            }
            "table" => {
                self.end_block();
                self.walk(element, style, depth);
                self.end_block();
            }
            "code" => self.walk(element, style.fg(Color::Yellow), depth),
            "strong" | "b" => self.walk(element, style.add_modifier(Modifier::BOLD), depth),
            "em" | "i" => self.walk(element, style.add_modifier(Modifier::ITALIC), depth),
            "del" | "s" => self.walk(element, style.add_modifier(Modifier::CROSSED_OUT), depth),
            "a" => self.walk(
                element,
                style.fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                depth,
            ),
            _ => self.walk(element, style, depth),
        }
    }

    fn list(&mut self, list: ElementRef<'_>, style: Style, depth: usize) {
        let ordered = list.value().name() == "ol";
        let start: usize = list
            .value()
            .attr("start")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);
        let indent = "  ".repeat(depth);

        let items = list
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|item| item.value().name() == "li");
        for (index, item) in items.enumerate() {
            let marker = if ordered {
                format!("{}{}. ", indent, start + index)
            } else {
                format!("{}• ", indent)
            };
            self.push(marker, style.fg(Color::Green));
            self.walk(item, style, depth + 1);
            self.flush();
        }
    }
}

/// Rows made of `<th>` cells
fn is_header_row(row: ElementRef<'_>) -> bool {
    row.children()
        .filter_map(ElementRef::wrap)
        .any(|cell| cell.value().name() == "th")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_texts(display: &SummaryDisplay) -> Vec<String> {
        display.plain_text().lines().map(str::to_string).collect()
    }

    #[test]
    fn empty_summary_renders_nothing() {
        assert_eq!(SummaryDisplay::from_summary(""), None);
    }

    #[test]
    fn heading_summary_renders_card() {
        let display = SummaryDisplay::from_summary("# Hi").unwrap();

        assert!(display.fragment().contains("<h1>Hi</h1>"));
        let card = display.html();
        assert!(card.starts_with("<section class=\"card\">"));
        assert!(card.contains("<h2>Summary:</h2>"));
        assert!(card.contains("<h1>Hi</h1>"));
    }

    #[test]
    fn inline_script_never_reaches_output() {
        let display =
            SummaryDisplay::from_summary("Fine text <script>document.cookie</script>").unwrap();

        assert!(!display.html().to_lowercase().contains("<script"));
        assert!(!display.plain_text().contains("document.cookie"));
    }

    #[test]
    fn terminal_lines_follow_structure() {
        let display = SummaryDisplay::from_summary(
            "# Title\n\nFirst paragraph\nwraps here.\n\n- one\n- **two**\n\n1. alpha\n2. beta",
        )
        .unwrap();

        assert_eq!(
            line_texts(&display),
            vec![
                "Title",
                "",
                "First paragraph wraps here.",
                "",
                "• one",
                "• two",
                "",
                "1. alpha",
                "2. beta",
            ]
        );
    }

    #[test]
    fn nested_lists_are_indented() {
        let display = SummaryDisplay::from_summary("- outer\n  - inner").unwrap();
        assert_eq!(line_texts(&display), vec!["• outer", "  • inner"]);
    }

    #[test]
    fn code_blocks_keep_their_lines() {
        let display = SummaryDisplay::from_summary("```\nlet a = 1;\nlet b = 2;\n```").unwrap();
        assert_eq!(line_texts(&display), vec!["    let a = 1;", "    let b = 2;"]);
    }

    #[test]
    fn bold_span_is_styled() {
        let display = SummaryDisplay::from_summary("plain **bold**").unwrap();
        let lines = display.lines();
        let bold = lines[0]
            .spans
            .iter()
            .find(|span| span.content == "bold")
            .unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }
}
