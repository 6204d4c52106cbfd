use axum::response::Html;

/// A terminal HTML page shown to the payer. Every line is treated as
/// untrusted and escaped when rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPage {
    pub heading: String,
    pub lines: Vec<String>,
}

impl ErrorPage {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            lines: Vec::new(),
        }
    }

    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    pub fn render(&self) -> String {
        let mut body = format!("<h1>{}</h1>", html_escape::encode_text(&self.heading));
        for line in &self.lines {
            body.push_str("<p>");
            body.push_str(&html_escape::encode_text(line));
            body.push_str("</p>");
        }
        format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Payment</title></head>\
             <body style=\"font-family: sans-serif; text-align: center; padding-top: 50px;\">{body}</body></html>"
        )
    }

    pub fn into_html(self) -> Html<String> {
        Html(self.render())
    }
}
