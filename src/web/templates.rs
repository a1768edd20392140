//! HTML page rendering.

use crate::error::Result;
use handlebars::Handlebars;
use serde::Serialize;

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>RAG Chatbot</title>
  <style>
    body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
    textarea { width: 100%; }
    .reply { white-space: pre-wrap; background: #f4f4f4; padding: 1rem; border-radius: 4px; }
    .error { color: #a00; }
  </style>
</head>
<body>
  <h1>RAG Chatbot</h1>
  <form method="post" action="/">
    <textarea name="query" rows="3" placeholder="Ask a question...">{{query}}</textarea>
    <p><button type="submit">Ask</button></p>
  </form>
  {{#if error}}
  <p class="error">{{error}}</p>
  {{/if}}
  {{#if response}}
  <h2>Your query</h2>
  <p>{{query}}</p>
  <h2>Answer</h2>
  <div class="reply">{{response}}</div>
  {{/if}}
</body>
</html>
"#;

/// Values shown on the index page.
#[derive(Debug, Default, Serialize)]
pub struct IndexPage<'a> {
    pub query: Option<&'a str>,
    pub response: Option<&'a str>,
    pub error: Option<&'a str>,
}

/// Render the index page. Every value is HTML-escaped.
pub fn render_index(page: &IndexPage<'_>) -> Result<String> {
    let handlebars = Handlebars::new();
    Ok(handlebars.render_template(INDEX_PAGE, page)?)
}
