//! Question bank and company list filtering.
//!
//! Filters are pure: the result depends only on the collection and the filter, and
//! matching items keep their original order.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{CompanyView, Difficulty, Priority, Question, QuestionType};

/// Sentinel accepted by every categorical dimension.
pub const ALL: &str = "all";

/// A categorical filter value: everything, or exactly one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(expected) => expected == value,
        }
    }
}

impl<T> Selection<T>
where
    T: FromStr,
    T::Err: Display,
{
    /// Parse a query value. Absent, blank and `all` mean no restriction.
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Selection::All),
            Some(value) if value.eq_ignore_ascii_case(ALL) => Ok(Selection::All),
            Some(value) => value
                .parse::<T>()
                .map(Selection::Only)
                .map_err(|e| e.to_string()),
        }
    }
}

/// Merge two selections of the same dimension. Two different concrete values conflict.
fn merge<T: PartialEq + Clone>(a: &Selection<T>, b: &Selection<T>) -> Option<Selection<T>> {
    match (a, b) {
        (Selection::All, other) | (other, Selection::All) => Some(other.clone()),
        (Selection::Only(x), Selection::Only(y)) if x == y => Some(a.clone()),
        _ => None,
    }
}

/// Search text plus categorical selections over the question bank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionFilter {
    pub search: String,
    pub company: Selection<String>,
    pub year: Selection<i32>,
    pub question_type: Selection<QuestionType>,
    pub difficulty: Selection<Difficulty>,
}

impl QuestionFilter {
    fn matches_categories(&self, question: &Question) -> bool {
        self.company.accepts(&question.company)
            && self.year.accepts(&question.year)
            && self.question_type.accepts(&question.question_type)
            && self.difficulty.accepts(&question.difficulty)
    }

    /// Combine two filters that restrict different dimensions.
    ///
    /// Returns `None` when both restrict the same dimension to different values, or
    /// both carry different search text.
    pub fn combine(&self, other: &QuestionFilter) -> Option<QuestionFilter> {
        let search = {
            let (a, b) = (self.search.as_str(), other.search.as_str());
            if a.is_empty() {
                b.to_string()
            } else if b.is_empty() || a.to_lowercase() == b.to_lowercase() {
                a.to_string()
            } else {
                return None;
            }
        };

        Some(QuestionFilter {
            search,
            company: merge(&self.company, &other.company)?,
            year: merge(&self.year, &other.year)?,
            question_type: merge(&self.question_type, &other.question_type)?,
            difficulty: merge(&self.difficulty, &other.difficulty)?,
        })
    }
}

/// Raw query parameters of the question bank page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default, rename = "type")]
    pub question_type: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl TryFrom<QuestionQuery> for QuestionFilter {
    type Error = AppError;

    fn try_from(query: QuestionQuery) -> Result<Self, Self::Error> {
        let bad = |field: &str, reason: String| {
            AppError::BadRequest(format!("Invalid `{}` filter: {}", field, reason))
        };

        Ok(QuestionFilter {
            search: query.q.unwrap_or_default(),
            company: match query.company.as_deref().map(str::trim) {
                None | Some("") => Selection::All,
                Some(c) if c.eq_ignore_ascii_case(ALL) => Selection::All,
                Some(c) => Selection::Only(c.to_string()),
            },
            year: Selection::parse(query.year.as_deref()).map_err(|e| bad("year", e))?,
            question_type: Selection::parse(query.question_type.as_deref())
                .map_err(|e| bad("type", e))?,
            difficulty: Selection::parse(query.difficulty.as_deref())
                .map_err(|e| bad("difficulty", e))?,
        })
    }
}

/// `needle` must already be lowercased. An empty needle matches everything.
fn matches_search(question: &Question, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    question.question.to_lowercase().contains(needle)
        || question.company.to_lowercase().contains(needle)
        || question
            .topics
            .iter()
            .any(|topic| topic.to_lowercase().contains(needle))
}

/// Apply a filter to the question bank, keeping the original order.
pub fn filter_questions<'a>(questions: &'a [Question], filter: &QuestionFilter) -> Vec<&'a Question> {
    let needle = filter.search.to_lowercase();
    questions
        .iter()
        .filter(|q| matches_search(q, &needle) && filter.matches_categories(q))
        .collect()
}

/// Values offered by the question bank dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionFacets {
    /// Distinct company names in first-seen order
    pub companies: Vec<String>,
    /// Distinct years, newest first
    pub years: Vec<i32>,
}

pub fn facets(questions: &[Question]) -> QuestionFacets {
    let mut companies: Vec<String> = Vec::new();
    let mut years: Vec<i32> = Vec::new();

    for question in questions {
        if !companies.contains(&question.company) {
            companies.push(question.company.clone());
        }
        if !years.contains(&question.year) {
            years.push(question.year);
        }
    }
    years.sort_unstable_by(|a, b| b.cmp(a));

    QuestionFacets { companies, years }
}

/// Quick filters of the student dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanyFilter {
    #[default]
    All,
    Eligible,
    /// High priority companies the student is eligible for
    HighPriority,
    /// Companies still accepting students
    Upcoming,
}

impl CompanyFilter {
    pub fn matches(&self, view: &CompanyView) -> bool {
        match self {
            CompanyFilter::All => true,
            CompanyFilter::Eligible => view.is_eligible(),
            CompanyFilter::HighPriority => {
                view.company.priority == Priority::High && view.is_eligible()
            }
            CompanyFilter::Upcoming => view.company.status.is_active(),
        }
    }
}

/// Keep the companies accepted by the filter, in their original order.
pub fn filter_companies(views: Vec<CompanyView>, filter: CompanyFilter) -> Vec<CompanyView> {
    views.into_iter().filter(|v| filter.matches(v)).collect()
}
