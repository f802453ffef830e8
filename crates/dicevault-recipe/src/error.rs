//! Error types for recipe parsing and canonicalization.

use thiserror::Error;

/// Errors from parsing or canonicalizing recipe JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipeError {
    /// Recipe JSON could not be parsed.
    #[error("invalid recipe JSON: {0}")]
    InvalidRecipeJson(String),

    /// Unsealing instructions JSON could not be parsed.
    #[error("invalid unsealing instructions JSON: {0}")]
    InvalidUnsealingInstructions(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_layer() {
        let recipe = RecipeError::InvalidRecipeJson("eof".to_string());
        assert!(recipe.to_string().contains("recipe"));

        let instructions = RecipeError::InvalidUnsealingInstructions("eof".to_string());
        assert!(instructions.to_string().contains("unsealing instructions"));
    }
}
