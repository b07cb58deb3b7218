// src/poem/prompt.rs
// Builds the generation instruction from a poem request

use super::request::PoemRequest;

/// Render `label: score` pairs, e.g. `joy: 0.8, sadness: 0.1`
pub fn render_emotions(request: &PoemRequest) -> String {
    request
        .labeled_emotions()
        .iter()
        .map(|(label, score)| format!("{}: {}", label, score))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Instruction asking the generator for a poem that subtly reflects the
/// user's emotional state. `classifier_model` names the model the chunks
/// will be scored with.
pub fn build_instruction(request: &PoemRequest, classifier_model: &str) -> String {
    format!(
        "Generate a poem using the following prompt: '{}'. \
         Consider the user's current emotional state: {}. \
         The poem should subtly reflect or respond to these emotions based on this model: {}.",
        request.prompt,
        render_emotions(request),
        classifier_model
    )
}
