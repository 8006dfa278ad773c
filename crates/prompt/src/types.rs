//! Prompt types for the Virtual TA.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of the prompt used to answer student questions.
pub const ANSWER_PROMPT_ID: &str = "ta.answer";

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Context injection settings
    #[serde(default)]
    pub context: PromptContextConfig,

    /// Template string with Handlebars syntax.
    ///
    /// Available variables: `question`, `context`, `imageContext`.
    pub template: String,
}

/// Context injection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptContextConfig {
    /// Course context is cut to this many characters before injection
    #[serde(rename = "maxContextChars", default = "default_max_context_chars")]
    pub max_context_chars: usize,
}

fn default_max_context_chars() -> usize {
    800
}

impl Default for PromptContextConfig {
    fn default() -> Self {
        Self {
            max_context_chars: default_max_context_chars(),
        }
    }
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message (optional)
    pub system: Option<String>,

    /// User message (required)
    pub user: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Characters of course context that made it into the prompt
    #[serde(rename = "contextChars")]
    pub context_chars: usize,

    /// Whether an image description was injected
    #[serde(rename = "imageContextIncluded")]
    pub image_context_included: bool,

    /// Variables used for rendering
    #[serde(rename = "resolvedVariables")]
    pub resolved_variables: HashMap<String, String>,
}

impl BuiltPrompt {
    pub fn new(
        system: Option<String>,
        user: String,
        source_prompt_id: String,
        context_chars: usize,
        image_context_included: bool,
        resolved_variables: HashMap<String, String>,
    ) -> Self {
        Self {
            system,
            user,
            metadata: BuiltPromptMetadata {
                source_prompt_id,
                context_chars,
                image_context_included,
                resolved_variables,
            },
        }
    }
}

const DEFAULT_ANSWER_TEMPLATE: &str = "\
You are a Teaching Assistant for the Tools in Data Science (TDS) course at IIT Madras.

COURSE CONTEXT:
{{context}}

{{imageContext}}

STUDENT QUESTION: {{question}}

INSTRUCTIONS:
- Provide helpful, accurate answers based on TDS course content
- Be specific about assignments, tools (Python, Git, APIs), and requirements
- Keep responses concise but informative
- Reference course materials when relevant

Answer the student's question directly and helpfully.";

/// Built-in answer prompt, used when the workspace does not override it.
pub fn default_answer_prompt() -> PromptDefinition {
    PromptDefinition {
        id: ANSWER_PROMPT_ID.to_string(),
        title: "Teaching assistant answer".to_string(),
        api_version: "1.0".to_string(),
        created_by: "vta".to_string(),
        context: PromptContextConfig::default(),
        template: DEFAULT_ANSWER_TEMPLATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: ta.answer
title: Short answers
apiVersion: "1.0"
createdBy: staff
context:
  maxContextChars: 400
template: "{{question}}"
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "ta.answer");
        assert_eq!(def.context.max_context_chars, 400);
    }

    #[test]
    fn test_context_limit_defaults() {
        let yaml = r#"
id: ta.answer
title: Minimal
apiVersion: "1.0"
template: "{{question}}"
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.context.max_context_chars, 800);
        assert!(def.created_by.is_empty());
    }

    #[test]
    fn test_default_answer_prompt() {
        let def = default_answer_prompt();
        assert_eq!(def.id, ANSWER_PROMPT_ID);
        assert!(def.template.contains("{{question}}"));
        assert!(def.template.contains("{{context}}"));
        assert!(def.template.contains("{{imageContext}}"));
    }
}
