//! Prompt templates for lyttekort.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub cards: CardPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}


/// Prompts for flashcard summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CardPrompts {
    pub system: String,
    pub user: String,
}

impl Default for CardPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a study assistant that distills podcast transcripts into flashcard material.

When summarizing a transcript:
1. Identify the most important ideas, claims, and takeaways
2. Prefer concrete, self-contained statements over vague themes
3. Back each point with the speaker's own words

Formatting rules:
- Output a numbered list ("1.", "2.", ...) with at most {{max_points}} points
- Under each point, add up to {{max_quotes}} supporting quotes as "- " bullet lines
- Quotes must be full multi-sentence passages taken verbatim from the transcript
- Do not add headings, preambles, or commentary outside the list"#
                .to_string(),

            user: r#"Summarize the transcript in up to {{max_points}} key points. For each point, provide up to {{max_quotes}} full multi-sentence quotes as supporting evidence.

Podcast: {{podcast_title}}
Episode: {{episode_title}}

Transcript:
{{transcript}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        // Store custom variables
        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            // Load card prompts if file exists
            let cards_path = custom_path.join("cards.toml");
            if cards_path.exists() {
                let content = std::fs::read_to_string(&cards_path)?;
                prompts.cards = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        // Start with custom variables, then override with provided vars
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.cards.system.is_empty());
        assert!(prompts.cards.user.contains("{{transcript}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_custom_variables_yield_to_provided() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("tone".to_string(), "formal".to_string());

        let mut vars = std::collections::HashMap::new();
        vars.insert("tone".to_string(), "casual".to_string());

        let result = prompts.render_with_custom("Be {{tone}}.", &vars);
        assert_eq!(result, "Be casual.");
    }
}
