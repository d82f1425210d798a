//! Interview question bank models.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category of an interview question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    Coding,
    #[serde(rename = "HR")]
    Hr,
    Aptitude,
    #[serde(rename = "System Design")]
    SystemDesign,
    Technical,
    #[serde(rename = "Group Discussion")]
    GroupDiscussion,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Coding => "Coding",
            QuestionType::Hr => "HR",
            QuestionType::Aptitude => "Aptitude",
            QuestionType::SystemDesign => "System Design",
            QuestionType::Technical => "Technical",
            QuestionType::GroupDiscussion => "Group Discussion",
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    /// Accepts the display form ("System Design") as well as snake case ("system_design").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', " ").as_str() {
            "coding" => Ok(QuestionType::Coding),
            "hr" => Ok(QuestionType::Hr),
            "aptitude" => Ok(QuestionType::Aptitude),
            "system design" => Ok(QuestionType::SystemDesign),
            "technical" => Ok(QuestionType::Technical),
            "group discussion" => Ok(QuestionType::GroupDiscussion),
            _ => Err(format!("Unknown question type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("Unknown difficulty: {}", s)),
        }
    }
}

/// A previously asked interview question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub company_id: String,
    /// Company name, denormalized for display and search
    pub company: String,
    pub college_id: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
    pub question: String,
    pub difficulty: Difficulty,
    pub topics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    pub added_by: String,
    pub created_at: String,
}

/// Request body for adding a question.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub company_id: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub round: Option<String>,
    pub question: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hints: Option<Vec<String>>,
    #[serde(default)]
    pub solution: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_parsing() {
        assert_eq!(
            "System Design".parse::<QuestionType>(),
            Ok(QuestionType::SystemDesign)
        );
        assert_eq!(
            "system_design".parse::<QuestionType>(),
            Ok(QuestionType::SystemDesign)
        );
        assert_eq!("hr".parse::<QuestionType>(), Ok(QuestionType::Hr));
        assert!("Trivia".parse::<QuestionType>().is_err());
    }

    #[test]
    fn test_question_type_serde_uses_display_names() {
        let value = serde_json::to_value(QuestionType::GroupDiscussion).unwrap();
        assert_eq!(value, "Group Discussion");
        let parsed: QuestionType = serde_json::from_value(serde_json::json!("HR")).unwrap();
        assert_eq!(parsed, QuestionType::Hr);
    }

    #[test]
    fn test_difficulty_round_trips_through_str() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(difficulty.as_str().parse::<Difficulty>(), Ok(difficulty));
        }
    }
}
