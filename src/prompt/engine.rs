use crate::error::PromptError;
use tera::Tera;

/// Tera-backed template engine for building few-shot prompts.
pub struct TeraEngine {
    tera: Tera,
}

impl TeraEngine {
    /// Create with inline templates (no filesystem).
    pub fn new() -> Self {
        Self {
            tera: Tera::default(),
        }
    }

    /// Register a template from a string, replacing any previous one under
    /// the same name.
    pub fn add_template(&mut self, name: &str, content: &str) -> Result<(), PromptError> {
        self.tera
            .add_raw_template(name, content)
            .map_err(|e| PromptError::Render(e.to_string()))
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &tera::Context) -> Result<String, PromptError> {
        if !self.tera.get_template_names().any(|n| n == name) {
            return Err(PromptError::NotFound(name.to_string()));
        }
        self.tera
            .render(name, context)
            .map_err(|e| PromptError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tera::Context;

    #[test]
    fn add_and_render() {
        let mut engine = TeraEngine::new();
        engine.add_template("t", "Theme: {{ theme }}").unwrap();

        let mut ctx = Context::new();
        ctx.insert("theme", "rivers");
        assert_eq!(engine.render("t", &ctx).unwrap(), "Theme: rivers");
    }

    #[test]
    fn unknown_template_is_not_found() {
        let engine = TeraEngine::new();
        let err = engine.render("missing", &Context::new()).unwrap_err();
        assert!(matches!(err, PromptError::NotFound(_)));
    }

    #[test]
    fn missing_variable_is_a_render_error() {
        let mut engine = TeraEngine::new();
        engine.add_template("t", "{{ absent }}").unwrap();
        let err = engine.render("t", &Context::new()).unwrap_err();
        assert!(matches!(err, PromptError::Render(_)));
    }

    #[test]
    fn re_registration_replaces() {
        let mut engine = TeraEngine::new();
        engine.add_template("t", "one").unwrap();
        engine.add_template("t", "two").unwrap();
        assert_eq!(engine.render("t", &Context::new()).unwrap(), "two");
    }
}
