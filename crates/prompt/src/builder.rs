//! Prompt builder for rendering templates and injecting context.

use crate::types::{BuiltPrompt, PromptDefinition};
use handlebars::Handlebars;
use std::collections::HashMap;
use vta_core::{AppError, AppResult};

/// Build a prompt from a definition and input variables.
///
/// This function:
/// 1. Cuts the course context to the definition's character budget
/// 2. Injects the context and the optional image description
/// 3. Renders the template using Handlebars
///
/// # Arguments
/// * `definition` - Prompt definition (built-in or loaded from YAML)
/// * `variables` - Template variables (e.g., "question" -> student input)
/// * `course_context` - Retrieved course context, if any
/// * `image_context` - Short description of an attached image, if any
///
/// # Example
/// ```no_run
/// use vta_prompt::{build_prompt, default_answer_prompt};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut vars = HashMap::new();
/// vars.insert("question".to_string(), "How do I submit GA1?".to_string());
///
/// let built = build_prompt(&default_answer_prompt(), vars, Some("Course Material - ..."), None)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    mut variables: HashMap<String, String>,
    course_context: Option<&str>,
    image_context: Option<&str>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let context = course_context
        .map(|ctx| truncate_chars(ctx, definition.context.max_context_chars))
        .unwrap_or_default();
    let context_chars = context.chars().count();
    variables.insert("context".to_string(), context);

    let image_context = image_context
        .map(str::trim)
        .filter(|img| !img.is_empty())
        .map(str::to_string);
    let image_context_included = image_context.is_some();
    variables.insert("imageContext".to_string(), image_context.unwrap_or_default());

    let rendered = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt::new(
        None,
        rendered,
        definition.id.clone(),
        context_chars,
        image_context_included,
        variables,
    ))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text prompt, no HTML escaping
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

/// First `max_chars` characters of `text`.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
