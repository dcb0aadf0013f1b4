//! Prompt templates for the three pipeline stages

use crate::conversation::entities::{ConversationHistory, Turn};
use crate::pipeline::answers::{AgentAnswer, AnswerSet};

/// System instruction for the initial fan-out
pub const INITIAL_SYSTEM: &str = r#"You are one of several independent experts answering the same question.
Your answer is internal: it will not be shown to the user. Other experts will read it,
and a final answer will be synthesized from all of them.
Give a complete and accurate answer. Prefer correctness over brevity, state assumptions
explicitly, and do not address the user directly."#;

/// System instruction for the refinement fan-out
pub const REFINEMENT_SYSTEM: &str = r#"You are an expert revising your own earlier answer after reading answers from your peers.
Critically compare your answer with theirs. Correct mistakes, fill gaps, and adopt better
reasoning where a peer's answer is stronger, but keep what you got right.
Output only your revised answer. It is internal and will not be shown to the user."#;

/// System instruction for the final synthesis call
pub const SYNTHESIS_SYSTEM: &str = r#"You are the moderator producing the single final answer the user will read.
You are given several refined expert answers to the user's question.
Merge their strongest, best-supported content into one coherent, well-structured answer.
Resolve disagreements in favour of the better-reasoned position. Do not mention the
experts, the drafts, or this process; answer the user directly."#;

/// System instruction plus content turn for one service call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePrompt {
    pub system_instruction: &'static str,
    pub turn: Turn,
}

/// Builders for each stage's request payload
pub struct PromptTemplate;

impl PromptTemplate {
    /// Stage 1: the raw query, unchanged, as a single user turn
    pub fn initial(query: &str) -> StagePrompt {
        StagePrompt {
            system_instruction: INITIAL_SYSTEM,
            turn: Turn::user(query),
        }
    }

    /// Stage 2: one agent's own answer plus its peers' answers.
    ///
    /// `others` is embedded in the order given; callers pass
    /// [`AnswerSet::others`], which is ascending index order.
    pub fn refinement(query: &str, own: &AgentAnswer, others: &[&AgentAnswer]) -> StagePrompt {
        let mut prompt = format!(
            r#"Original question: {}

--- Your answer ---
{}
"#,
            query, own.text
        );

        prompt.push_str("\nAnswers from the other experts:\n");
        for (position, other) in others.iter().enumerate() {
            prompt.push_str(&format!(
                "\n--- Other answer {} ---\n{}\n",
                Self::label(position),
                other.text
            ));
        }

        prompt.push_str(
            r#"
Critically review your answer in light of the other answers and write an improved
version of your answer to the original question."#,
        );

        StagePrompt {
            system_instruction: REFINEMENT_SYSTEM,
            turn: Turn::user(prompt),
        }
    }

    /// Stage 3: every refined answer, in stage-2 index order
    pub fn synthesis(query: &str, refined: &AnswerSet) -> StagePrompt {
        let mut prompt = format!(
            r#"Original question: {}

Refined expert answers:
"#,
            query
        );

        for answer in refined.iter() {
            prompt.push_str(&format!(
                "\n--- Expert {} ---\n{}\n",
                answer.index + 1,
                answer.text
            ));
        }

        prompt.push_str(
            r#"
Using the answers above, write the single final answer to the original question."#,
        );

        StagePrompt {
            system_instruction: SYNTHESIS_SYSTEM,
            turn: Turn::user(prompt),
        }
    }

    /// Request contents: prior conversation, then the stage turn last.
    ///
    /// A history that already ends with the stage turn (a chat caller that
    /// recorded the query before running) is not repeated.
    pub fn contents(history: &ConversationHistory, prompt: &StagePrompt) -> Vec<Turn> {
        let mut contents = Vec::with_capacity(history.len() + 1);
        contents.extend(history.turns().iter().cloned());
        if history.last() != Some(&prompt.turn) {
            contents.push(prompt.turn.clone());
        }
        contents
    }

    fn label(position: usize) -> char {
        (b'A' + position as u8) as char
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::entities::Role;

    fn set(prefix: &str) -> AnswerSet {
        AnswerSet::from_texts((0..4).map(|i| format!("{prefix}-answer-{i}")).collect()).unwrap()
    }

    fn position(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("{needle:?} not found"))
    }

    #[test]
    fn test_initial_wraps_raw_query() {
        let prompt = PromptTemplate::initial("Define entropy.");
        assert_eq!(prompt.turn, Turn::user("Define entropy."));
        assert_eq!(prompt.system_instruction, INITIAL_SYSTEM);
    }

    #[test]
    fn test_refinement_tags_own_and_orders_others() {
        let initial = set("initial");
        for i in 0..4 {
            let prompt = PromptTemplate::refinement("Q", initial.own(i), &initial.others(i));
            let text = prompt.turn.text();
            assert_eq!(prompt.system_instruction, REFINEMENT_SYSTEM);

            let own_tag = position(text, "--- Your answer ---");
            let own = position(text, &format!("initial-answer-{i}"));
            assert!(own > own_tag);
            assert_eq!(text.matches(&format!("initial-answer-{i}")).count(), 1);

            let others: Vec<usize> = (0..4)
                .filter(|j| *j != i)
                .map(|j| position(text, &format!("initial-answer-{j}")))
                .collect();
            assert_eq!(others.len(), 3);
            assert!(others.windows(2).all(|w| w[0] < w[1]), "agent {i}");
            assert!(others.iter().all(|p| *p > own));
            assert_eq!(text.matches("--- Other answer").count(), 3);
        }
    }

    #[test]
    fn test_synthesis_embeds_all_refined_in_order() {
        let refined = set("refined");
        let prompt = PromptTemplate::synthesis("Define entropy.", &refined);
        let text = prompt.turn.text();

        assert_eq!(prompt.system_instruction, SYNTHESIS_SYSTEM);
        assert!(text.contains("Define entropy."));
        let positions: Vec<usize> = (0..4)
            .map(|i| position(text, &format!("refined-answer-{i}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!text.contains("initial-answer"));
    }

    #[test]
    fn test_contents_ends_with_stage_turn() {
        let history = ConversationHistory::from(vec![Turn::user("earlier"), Turn::agent("reply")]);
        let prompt = PromptTemplate::initial("now");
        let contents = PromptTemplate::contents(&history, &prompt);

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1].role(), Role::Agent);
        assert_eq!(contents.last(), Some(&Turn::user("now")));
    }

    #[test]
    fn test_contents_does_not_repeat_recorded_query() {
        let history = ConversationHistory::from(vec![Turn::user("now")]);

        let initial = PromptTemplate::contents(&history, &PromptTemplate::initial("now"));
        assert_eq!(initial, vec![Turn::user("now")]);

        let answers = set("refined");
        let synthesis = PromptTemplate::contents(&history, &PromptTemplate::synthesis("now", &answers));
        assert_eq!(synthesis.len(), 2);
        assert_eq!(synthesis[0], Turn::user("now"));
    }

    #[test]
    fn test_builders_are_deterministic() {
        let initial = set("initial");
        let a = PromptTemplate::refinement("Q", initial.own(2), &initial.others(2));
        let b = PromptTemplate::refinement("Q", initial.own(2), &initial.others(2));
        assert_eq!(a, b);
    }
}
