use crate::models::Difficulty;

/// Builds the instruction sent to the model for a single question.
pub fn build_prompt(topic: &str, difficulty: Difficulty) -> String {
    format!(
        "You are a quiz generator. Create a single multiple-choice quiz question on the topic \
         of \"{topic}\" at a \"{difficulty}\" difficulty level. Make sure the question is unique \
         and challenging. The format should be:\n\
         Question: <The question>\n\
         A. <Option A>\n\
         B. <Option B>\n\
         C. <Option C>\n\
         D. <Option D>\n\
         Correct Answer: <Correct option letter>\n\
         Explanation: <1-2 line explanation>\n\
         \n\
         Important:\n\
         - Make sure options are clearly distinct\n\
         - Avoid obvious incorrect answers\n\
         - Include plausible distractors\n\
         - Keep question text clear and concise\n\
         - If the question refers to code, put the code in a fenced code block (```) \
         directly after the question line\n",
        topic = topic.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_topic_and_difficulty() {
        let prompt = build_prompt("  Algebra ", Difficulty::Hard);
        assert!(prompt.contains("topic of \"Algebra\""));
        assert!(prompt.contains("\"Hard\" difficulty"));
    }

    #[test]
    fn test_prompt_describes_reply_layout() {
        let prompt = build_prompt("Rust", Difficulty::Easy);
        let layout = [
            "\nQuestion: ",
            "\nA. ",
            "\nB. ",
            "\nC. ",
            "\nD. ",
            "\nCorrect Answer: ",
            "\nExplanation: ",
        ];

        let mut last = 0;
        for marker in layout {
            let position = prompt[last..]
                .find(marker)
                .map(|offset| last + offset)
                .unwrap_or_else(|| panic!("missing {:?}", marker));
            last = position + marker.len();
        }
    }
}
