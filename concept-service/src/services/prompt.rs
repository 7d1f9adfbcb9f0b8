use crate::models::ConceptReport;

/// Wrap caller code in the concept-extraction instructions.
///
/// The code is embedded verbatim after the `Code:` label, so the output is a
/// pure function of `code`.
pub fn build_prompt(code: &str) -> String {
    format!(
        r#"
You are a computer science concept extraction engine.

You MUST return valid JSON only.
Do NOT include markdown.
Do NOT include explanation outside JSON.
Do NOT wrap in backticks.

If any field is not applicable, return "N/A" or [].

Return JSON with EXACT structure:

{schema}


Code:
{code}
"#,
        schema = ConceptReport::schema_template(),
        code = code,
    )
}
