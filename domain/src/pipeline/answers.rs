//! Index-tagged agent answers produced within a single stage.

use super::PANEL_SIZE;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// One agent's answer within a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentAnswer {
    pub index: usize,
    pub text: String,
}

impl AgentAnswer {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// The complete set of answers from one fan-out stage.
///
/// Always holds exactly [`PANEL_SIZE`] answers, with agent `i` in slot `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerSet {
    answers: Vec<AgentAnswer>,
}

impl AnswerSet {
    /// Build a set from answer texts in agent index order.
    pub fn from_texts(texts: Vec<String>) -> Result<Self, DomainError> {
        if texts.len() != PANEL_SIZE {
            return Err(DomainError::AnswerCount {
                expected: PANEL_SIZE,
                actual: texts.len(),
            });
        }

        let answers = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| AgentAnswer::new(index, text))
            .collect();

        Ok(Self { answers })
    }

    /// Agent `index`'s own answer.
    ///
    /// # Panics
    /// Panics if `index >= PANEL_SIZE`.
    pub fn own(&self, index: usize) -> &AgentAnswer {
        &self.answers[index]
    }

    /// Every answer except agent `index`'s, in ascending index order.
    pub fn others(&self, index: usize) -> Vec<&AgentAnswer> {
        self.answers.iter().filter(|a| a.index != index).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentAnswer> {
        self.answers.iter()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.answers.iter().map(|a| a.text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnswerSet {
        AnswerSet::from_texts(vec![
            "I0".to_string(),
            "I1".to_string(),
            "I2".to_string(),
            "I3".to_string(),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_wrong_size() {
        let err = AnswerSet::from_texts(vec!["only".to_string()]).unwrap_err();
        assert_eq!(
            err,
            DomainError::AnswerCount {
                expected: 4,
                actual: 1
            }
        );
        assert!(AnswerSet::from_texts(vec![String::new(); 5]).is_err());
    }

    #[test]
    fn test_slots_match_indices() {
        let set = sample();
        for (i, answer) in set.iter().enumerate() {
            assert_eq!(answer.index, i);
            assert_eq!(set.own(i).text, format!("I{}", i));
        }
    }

    #[test]
    fn test_others_excludes_self_in_ascending_order() {
        let set = sample();
        let expected = [
            ["I1", "I2", "I3"],
            ["I0", "I2", "I3"],
            ["I0", "I1", "I3"],
            ["I0", "I1", "I2"],
        ];
        for (i, want) in expected.iter().enumerate() {
            let got: Vec<&str> = set.others(i).iter().map(|a| a.text.as_str()).collect();
            assert_eq!(got, want.to_vec(), "others({})", i);
        }
    }
}
