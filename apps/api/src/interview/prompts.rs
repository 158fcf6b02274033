// All LLM prompt constants for the interview flow.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::interview::models::Difficulty;
use crate::llm_client::prompts::{SCORE_FORMAT_INSTRUCTION, SINGLE_QUESTION_INSTRUCTION};

const BEGINNER_ROLE: &str = "You are an Excel Interviewer AI for BEGINNER level. \
    You must ask EXACTLY ONE basic Excel interview question. \
    Focus on: basic formulas (SUM, AVERAGE, COUNT), basic functionalities, \
    simple data entry, basic formatting, and fundamental Excel concepts.";

const INTERMEDIATE_ROLE: &str = "You are an Excel Interviewer AI for INTERMEDIATE level. \
    You must ask EXACTLY ONE intermediate Excel interview question. \
    Focus on: intermediate formulas (VLOOKUP, IF, INDEX/MATCH), \
    data analysis, pivot tables, charts, conditional formatting, \
    and small case studies with practical scenarios.";

const ADVANCED_ROLE: &str = "You are an Excel Interviewer AI for ADVANCED level. \
    You must ask EXACTLY ONE advanced Excel interview question. \
    Focus on: complex case studies, advanced formulas (array formulas, \
    DAX, Power Query), data modeling, automation, complex scenarios \
    requiring multiple Excel features, and real-world business problems.";

/// Evaluation prompt template.
/// Replace: {rubric}, {question}, {answer}, {score_format}
const EVALUATION_PROMPT_TEMPLATE: &str = "Evaluate this Excel answer on a scale of 0-5 and provide brief feedback:

{rubric}

Question: {question}
Answer: {answer}

{score_format}";

/// Role instruction for question generation at the given level.
pub fn question_system_prompt(difficulty: Difficulty) -> String {
    let role = match difficulty {
        Difficulty::Beginner => BEGINNER_ROLE,
        Difficulty::Intermediate => INTERMEDIATE_ROLE,
        Difficulty::Advanced => ADVANCED_ROLE,
    };
    format!("{role} {SINGLE_QUESTION_INSTRUCTION}")
}

/// Full question prompt. Questions after the first are grounded in the
/// previous turn's raw input so consecutive questions drift apart.
pub fn question_prompt(difficulty: Difficulty, previous_answer: Option<&str>) -> String {
    let system = question_system_prompt(difficulty);
    match previous_answer {
        None => system,
        Some(previous) => {
            format!("{system}\n\nPrevious answer: {previous}\n\nNow ask the next Excel question.")
        }
    }
}

/// Rubric sentence prepended to evaluation prompts.
pub fn evaluation_rubric(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Beginner => {
            "This is a BEGINNER level Excel question. Evaluate based on basic Excel knowledge, \
             simple formulas, and fundamental concepts."
        }
        Difficulty::Intermediate => {
            "This is an INTERMEDIATE level Excel question. Evaluate based on intermediate \
             formulas, data analysis skills, and practical application."
        }
        Difficulty::Advanced => {
            "This is an ADVANCED level Excel question. Evaluate based on complex problem-solving, \
             advanced features, and comprehensive Excel expertise."
        }
    }
}

pub fn evaluation_prompt(difficulty: Difficulty, question: &str, answer: &str) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replace("{rubric}", evaluation_rubric(difficulty))
        .replace("{score_format}", SCORE_FORMAT_INSTRUCTION)
        .replace("{question}", question)
        .replace("{answer}", answer)
}
