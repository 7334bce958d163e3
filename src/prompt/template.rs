//! `{variable}` substitution for prompt and runner-command templates.
//!
//! The engine is fail-safe: an undefined variable is an error rather than a
//! silent empty substitution, so a typo in a template surfaces immediately
//! instead of producing a subtly broken prompt.
//!
//! # Syntax
//!
//! - `{name}` substitutes the value of `name` (surrounding whitespace in
//!   the name is ignored)
//! - `{{` and `}}` render literal braces

use std::collections::HashMap;
use thiserror::Error;

/// Template rendering failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A variable was referenced but not provided.
    #[error("undefined variable '{name}' at position {position} in template")]
    UndefinedVariable { name: String, position: usize },

    /// A `{` was found without a matching `}`.
    #[error("unmatched '{{' at position {position} in template")]
    UnmatchedBrace { position: usize },

    /// An empty variable name was found (`{}` or `{  }`).
    #[error("empty variable name at position {position} in template")]
    EmptyVariableName { position: usize },
}

/// Render a template by substituting `{variable}` placeholders.
pub fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' => {
                if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    result.push('{');
                    continue;
                }

                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, c)) => name.push(c),
                        None => return Err(TemplateError::UnmatchedBrace { position: pos }),
                    }
                }

                let name = name.trim();
                if name.is_empty() {
                    return Err(TemplateError::EmptyVariableName { position: pos });
                }

                match variables.get(name) {
                    Some(value) => result.push_str(value),
                    None => {
                        return Err(TemplateError::UndefinedVariable {
                            name: name.to_string(),
                            position: pos,
                        });
                    }
                }
            }
            '}' => {
                // Collapse }} to a literal }; a lone } passes through.
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                }
                result.push('}');
            }
            _ => result.push(ch),
        }
    }

    Ok(result)
}
