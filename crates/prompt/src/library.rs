//! Prompt library: built-in definitions plus YAML overrides.

use crate::builder::build_prompt;
use crate::templates;
use crate::types::{BuiltPrompt, PromptDefinition};
use docqa_core::{QaError, QaResult};
use std::collections::HashMap;
use std::path::Path;

/// The set of prompt definitions the engine renders from.
///
/// Starts from the built-in defaults; [`PromptLibrary::load_overrides`]
/// replaces individual definitions from `<id>.yml` files so deployments can
/// tune wording without rebuilding.
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    definitions: HashMap<String, PromptDefinition>,
}

impl PromptLibrary {
    /// Create a library with only the built-in definitions.
    pub fn builtin() -> Self {
        let definitions = templates::builtin_definitions()
            .into_iter()
            .map(|def| (def.id.clone(), def))
            .collect();

        Self { definitions }
    }

    /// Create a library with built-ins, then apply overrides from a directory.
    pub fn with_overrides(dir: &Path) -> QaResult<Self> {
        let mut library = Self::builtin();
        library.load_overrides(dir)?;
        Ok(library)
    }

    /// Load `<id>.yml` override files from a directory.
    ///
    /// Files whose `id` does not name a known prompt are rejected; a typo in
    /// an override should fail loudly, not silently leave the default active.
    pub fn load_overrides(&mut self, dir: &Path) -> QaResult<()> {
        if !dir.exists() {
            return Err(QaError::Prompt(format!(
                "Prompt directory not found: {:?}",
                dir
            )));
        }

        for entry in walkdir::WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            let is_yaml = matches!(
                path.extension().and_then(|s| s.to_str()),
                Some("yml") | Some("yaml")
            );
            if !path.is_file() || !is_yaml {
                continue;
            }

            let definition = load_definition(path)?;

            if !self.definitions.contains_key(&definition.id) {
                return Err(QaError::Prompt(format!(
                    "Override {:?} names unknown prompt '{}'",
                    path, definition.id
                )));
            }

            tracing::info!("Prompt override applied: {} ({:?})", definition.id, path);
            self.definitions.insert(definition.id.clone(), definition);
        }

        Ok(())
    }

    /// Get a definition by ID.
    pub fn get(&self, id: &str) -> QaResult<&PromptDefinition> {
        self.definitions
            .get(id)
            .ok_or_else(|| QaError::Prompt(format!("Unknown prompt: {}", id)))
    }

    /// Render a prompt by ID with the given variables.
    pub fn render(&self, id: &str, variables: &HashMap<String, String>) -> QaResult<BuiltPrompt> {
        build_prompt(self.get(id)?, variables)
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Load and validate one prompt definition file.
fn load_definition(path: &Path) -> QaResult<PromptDefinition> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| QaError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e)))?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents)
        .map_err(|e| QaError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", path, e)))?;

    if definition.id.is_empty() {
        return Err(QaError::Prompt(format!("Prompt {:?} has an empty id", path)));
    }

    if definition.template.is_empty() {
        return Err(QaError::Prompt(format!(
            "Prompt {:?} has an empty template",
            path
        )));
    }

    Ok(definition)
}
