//! Default renderer: a self-contained, print-ready HTML document.

use async_trait::async_trait;
use bytes::Bytes;
use minijinja::{context, Environment};

use crate::export::renderer::{ArtifactRenderer, RenderError, RenderedDocument};

// The `.html` template name switches minijinja's auto-escaping on, so
// artifact text can never inject markup into the document.
const TEMPLATE_NAME: &str = "resume.html";

// Line breaks survive through `white-space: pre-wrap` instead of markup
// rewriting, keeping the artifact text byte-for-byte intact in the body.
const RESUME_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>Resume</title>
    <style>
      body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
        line-height: 1.6;
        color: #333;
      }
      .container {
        max-width: 800px;
        margin: 0 auto;
        padding: 40px;
        white-space: pre-wrap;
      }
    </style>
  </head>
  <body>
    <div class="container">{{ resume_text }}</div>
  </body>
</html>
"#;

pub struct HtmlDocumentRenderer {
    env: Environment<'static>,
}

impl HtmlDocumentRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, RESUME_TEMPLATE)
            .expect("Failed to compile resume template");
        Self { env }
    }
}

impl Default for HtmlDocumentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactRenderer for HtmlDocumentRenderer {
    async fn render(&self, artifact_text: &str) -> Result<RenderedDocument, RenderError> {
        let html = self
            .env
            .get_template(TEMPLATE_NAME)?
            .render(context! { resume_text => artifact_text })?;

        Ok(RenderedDocument {
            bytes: Bytes::from(html),
            content_type: "text/html; charset=utf-8",
            filename: "resume.html",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_render_embeds_artifact_text() {
        let renderer = HtmlDocumentRenderer::new();
        let document = renderer
            .render("Jane Doe\nSoftware Engineer")
            .await
            .unwrap();

        let html = String::from_utf8(document.bytes.to_vec()).unwrap();
        assert!(html.contains("Jane Doe\nSoftware Engineer"));
        assert!(html.contains("white-space: pre-wrap"));
        assert_eq!(document.content_type, "text/html; charset=utf-8");
        assert_eq!(document.filename, "resume.html");
    }

    #[tokio::test]
    async fn test_render_escapes_markup_in_artifact_text() {
        let renderer = HtmlDocumentRenderer::new();
        let document = renderer
            .render("Jane <script>alert('x')</script> Doe")
            .await
            .unwrap();

        let html = String::from_utf8(document.bytes.to_vec()).unwrap();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
