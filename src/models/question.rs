/// One answer option. Correctness is decided when the question is ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub text: String,
    pub is_correct: bool,
}

impl Choice {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

/// A multiple-choice question. The prompt may contain `$...$` math markup,
/// which is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    pub choices: Vec<Choice>,
}

impl Question {
    pub fn new(prompt: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            prompt: prompt.into(),
            choices,
        }
    }

    /// Whether choosing `index` is a correct answer. Out of range is wrong.
    pub fn is_correct(&self, index: usize) -> bool {
        self.choices.get(index).is_some_and(|c| c.is_correct)
    }

    pub fn correct_choices(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter().filter(|c| c.is_correct)
    }
}
