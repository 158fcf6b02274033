// Shared prompt constants used by every interview prompt.
// Module-specific templates live in interview::prompts.

/// Instruction appended to every question-generation prompt so the model
/// emits a single bare question.
pub const SINGLE_QUESTION_INSTRUCTION: &str = "Do NOT provide multiple questions. \
    Do NOT provide answers. \
    Do NOT continue with follow-up questions. \
    Your response should contain ONLY the single question you want to ask.";

/// Output-format instruction for evaluation prompts. The `N/5` shape is what
/// score extraction looks for.
pub const SCORE_FORMAT_INSTRUCTION: &str =
    "Provide: Score (0-5), written as N/5 (for example 3/5), and brief feedback.";
