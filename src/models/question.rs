use std::fmt;

use serde::{Deserialize, Serialize};

/// Label of one of the four answer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    pub fn index(self) -> usize {
        match self {
            OptionLabel::A => 0,
            OptionLabel::B => 1,
            OptionLabel::C => 2,
            OptionLabel::D => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_char(self) -> char {
        match self {
            OptionLabel::A => 'A',
            OptionLabel::B => 'B',
            OptionLabel::C => 'C',
            OptionLabel::D => 'D',
        }
    }

    /// Parses an upper-case option letter.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(OptionLabel::A),
            'B' => Some(OptionLabel::B),
            'C' => Some(OptionLabel::C),
            'D' => Some(OptionLabel::D),
            _ => None,
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Answer texts keyed by option label. All four labels are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOptions([String; 4]);

impl QuizOptions {
    pub fn new(
        a: impl Into<String>,
        b: impl Into<String>,
        c: impl Into<String>,
        d: impl Into<String>,
    ) -> Self {
        Self([a.into(), b.into(), c.into(), d.into()])
    }

    pub fn get(&self, label: OptionLabel) -> &str {
        &self.0[label.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionLabel, &str)> {
        OptionLabel::ALL
            .into_iter()
            .zip(self.0.iter().map(String::as_str))
    }
}

/// A generated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: QuizOptions,
    pub correct_answer: OptionLabel,
    pub explanation: String,
    pub code_snippet: Option<String>,
}

impl QuizQuestion {
    pub const PLACEHOLDER_TEXT: &'static str =
        "Failed to generate a proper question. Please try again.";

    /// Stand-in used when a reply cannot be parsed and the provider is told
    /// to keep the session moving anyway.
    pub fn placeholder() -> Self {
        Self {
            question: Self::PLACEHOLDER_TEXT.to_string(),
            options: QuizOptions::new("Option A", "Option B", "Option C", "Option D"),
            correct_answer: OptionLabel::A,
            explanation: "Could not parse the explanation.".to_string(),
            code_snippet: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.question == Self::PLACEHOLDER_TEXT
    }

    pub fn is_correct(&self, answer: OptionLabel) -> bool {
        self.correct_answer == answer
    }

    pub fn correct_text(&self) -> &str {
        self.options.get(self.correct_answer)
    }
}
