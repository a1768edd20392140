//! Prompt templates for ragchat.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid regex"))
}

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub rag: RagPrompts,
}

/// Prompt for grounded answer generation.
///
/// `{{context}}` receives the retrieved chunk contents and `{{query}}` the raw user query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub template: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            template: r#"Answer the query based on the provided context.
If the context does not contain the answer, say 'Answer not found'.
Context:
{{context}}
query: {{query}}
Answer:"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, overriding the defaults with files from `custom_dir` when present.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Placeholders are substituted in a single pass over the template, so
    /// substituted values are never scanned again. Unknown placeholders are kept.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        placeholder()
            .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt_has_placeholders() {
        let prompts = Prompts::default();
        assert!(prompts.rag.template.contains("{{context}}"));
        assert!(prompts.rag.template.contains("{{query}}"));
        assert!(prompts.rag.template.contains("Answer not found"));
    }

    #[test]
    fn test_render_template() {
        let template = "Context:\n{{context}}\nquery: {{query}}";
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), "Autism is a developmental condition.".to_string());
        vars.insert("query".to_string(), "What is autism?".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(
            result,
            "Context:\nAutism is a developmental condition.\nquery: What is autism?"
        );
    }

    #[test]
    fn test_values_are_not_rendered_again() {
        let template = "Context:\n{{context}}\nquery: {{query}}";
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), "SECRET CHUNK {{query}}".to_string());
        vars.insert("query".to_string(), "what does {{context}} mean?".to_string());

        for _ in 0..50 {
            assert_eq!(
                Prompts::render(template, &vars),
                "Context:\nSECRET CHUNK {{query}}\nquery: what does {{context}} mean?"
            );
        }
    }

    #[test]
    fn test_unknown_placeholder_is_kept() {
        let vars = HashMap::from([("query".to_string(), "hi".to_string())]);
        assert_eq!(Prompts::render("{{query}} {{other}}", &vars), "hi {{other}}");
    }

    #[test]
    fn test_custom_dir_overrides_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("rag.toml"),
            "template = \"Q: {{query}}\\nC: {{context}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str()).unwrap();
        assert_eq!(prompts.rag.template, "Q: {{query}}\nC: {{context}}");
    }

    #[test]
    fn test_missing_custom_dir_keeps_defaults() {
        let prompts = Prompts::load(Some("/nonexistent/ragchat/prompts")).unwrap();
        assert!(prompts.rag.template.starts_with("Answer the query"));
    }
}
