/// Translatable strings rendered by the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub edit: String,
    pub save: String,
    pub name: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            edit: "Edit".to_string(),
            save: "Save".to_string(),
            name: "Name:".to_string(),
        }
    }
}
