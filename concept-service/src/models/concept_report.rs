use serde::{Deserialize, Serialize};

/// Placeholder the model is told to use for scalar fields that do not apply.
pub const NOT_APPLICABLE: &str = "N/A";

/// Structured analysis the model is asked to produce.
///
/// The service only uses this type to describe the schema inside the prompt.
/// Model output is passed through as-is and never validated against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptReport {
    pub language: String,
    pub domain: String,
    pub primary_concepts: Vec<String>,
    pub secondary_concepts: Vec<String>,
    pub design_patterns: Vec<String>,
    pub architectural_layer: String,
    pub time_complexity: String,
    pub space_complexity: String,
    pub execution_flow: String,
    pub why_abstraction_exists: String,
    pub prerequisite_concepts: Vec<String>,
}

impl ConceptReport {
    /// Field names in schema order.
    pub const FIELDS: [&'static str; 11] = [
        "language",
        "domain",
        "primary_concepts",
        "secondary_concepts",
        "design_patterns",
        "architectural_layer",
        "time_complexity",
        "space_complexity",
        "execution_flow",
        "why_abstraction_exists",
        "prerequisite_concepts",
    ];

    /// The empty report rendered as pretty JSON, used as the schema block of
    /// the prompt: `""` for scalar fields and `[]` for list fields.
    pub fn schema_template() -> String {
        serde_json::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    /// A report where every field is marked as not applicable.
    pub fn not_applicable() -> Self {
        Self {
            language: NOT_APPLICABLE.to_string(),
            domain: NOT_APPLICABLE.to_string(),
            architectural_layer: NOT_APPLICABLE.to_string(),
            time_complexity: NOT_APPLICABLE.to_string(),
            space_complexity: NOT_APPLICABLE.to_string(),
            execution_flow: NOT_APPLICABLE.to_string(),
            why_abstraction_exists: NOT_APPLICABLE.to_string(),
            ..Self::default()
        }
    }
}
