use std::collections::HashSet;

/// Question texts already handed out in the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedQuestions {
    texts: HashSet<String>,
}

impl UsedQuestions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, question: &str) -> bool {
        self.texts.contains(question.trim())
    }

    /// Returns false if the text was already registered.
    pub fn insert(&mut self, question: &str) -> bool {
        self.texts.insert(question.trim().to_string())
    }

    pub fn clear(&mut self) {
        self.texts.clear();
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_ignores_surrounding_whitespace() {
        let mut used = UsedQuestions::new();
        assert!(used.insert("What is 2 + 2?"));
        assert!(used.contains("  What is 2 + 2?\n"));
        assert!(!used.insert("What is 2 + 2? "));
        assert_eq!(used.len(), 1);

        used.clear();
        assert!(used.is_empty());
        assert!(!used.contains("What is 2 + 2?"));
    }
}
