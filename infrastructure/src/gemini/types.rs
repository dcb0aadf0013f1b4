//! Wire types for the Gemini `generateContent` endpoint

use roundtable_domain::{Role, Turn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction<'a>>,
}

impl<'a> GenerateContentRequest<'a> {
    pub fn new(contents: &'a [Turn], system_instruction: &'a str) -> Self {
        let system_instruction = (!system_instruction.trim().is_empty()).then(|| {
            SystemInstruction {
                parts: vec![Part {
                    text: system_instruction,
                }],
            }
        });

        Self {
            contents: contents.iter().map(Content::from_turn).collect(),
            system_instruction,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub role: &'static str,
    pub parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn from_turn(turn: &'a Turn) -> Self {
        Self {
            role: wire_role(turn.role()),
            parts: vec![Part { text: turn.text() }],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SystemInstruction<'a> {
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Part<'a> {
    pub text: &'a str,
}

/// Gemini calls the assistant side of a conversation `model`
fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Agent => "model",
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if any
    pub fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        Some(text)
    }
}
