//! Tantivy-based search index module.
//!
//! Ranked full-text search over the question bank with field boosting.

use std::path::Path;
use std::sync::Arc;
use tantivy::collector::{Count, TopDocs};
use tantivy::query::{BooleanQuery, BoostQuery, Occur, QueryParser};
use tantivy::schema::{Field, Schema, Value, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::Question;

const BOOST_QUESTION: f32 = 10.0;
const BOOST_TOPICS: f32 = 8.0;
const BOOST_COMPANY: f32 = 6.0;
const BOOST_DESCRIPTION: f32 = 4.0;
const BOOST_HINTS: f32 = 2.0;

/// Deepest hit position a page may reach.
pub const MAX_SEARCH_WINDOW: usize = 10_000;

/// Search result with question and relevance score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub question_id: String,
    pub score: f32,
}

/// One page of hits plus the number of matching questions.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub hits: Vec<SearchResult>,
    pub total: usize,
}

struct SearchFields {
    question_id: Field,
    college_id: Field,
    question: Field,
    description: Field,
    topics: Field,
    company: Field,
    hints: Field,
}

/// Tantivy search index for questions.
pub struct QuestionIndex {
    index: Index,
    reader: IndexReader,
    writer: Arc<RwLock<IndexWriter>>,
    fields: SearchFields,
}

impl QuestionIndex {
    /// Create or open a search index at the specified path.
    pub fn open(index_path: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(index_path)
            .map_err(|e| AppError::Search(format!("Failed to create index directory: {}", e)))?;

        let mut schema_builder = Schema::builder();
        let question_id = schema_builder.add_text_field("question_id", STRING | STORED);
        let college_id = schema_builder.add_text_field("college_id", STRING);
        let question = schema_builder.add_text_field("question", TEXT);
        let description = schema_builder.add_text_field("description", TEXT);
        let topics = schema_builder.add_text_field("topics", TEXT);
        let company = schema_builder.add_text_field("company", TEXT);
        let hints = schema_builder.add_text_field("hints", TEXT);
        let schema = schema_builder.build();

        let fields = SearchFields {
            question_id,
            college_id,
            question,
            description,
            topics,
            company,
            hints,
        };

        let index = Index::open_in_dir(index_path)
            .or_else(|_| Index::create_in_dir(index_path, schema.clone()))
            .map_err(|e| AppError::Search(format!("Failed to open/create index: {}", e)))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer(50_000_000)
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            index,
            reader,
            writer: Arc::new(RwLock::new(writer)),
            fields,
        })
    }

    /// Replace the index contents with the given questions.
    pub async fn rebuild(&self, questions: &[Question]) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        writer.delete_all_documents()?;
        for question in questions {
            writer.add_document(self.create_document(question))?;
        }
        writer.commit()?;

        self.reader.reload()?;

        tracing::info!("Search index rebuilt with {} questions", questions.len());
        Ok(())
    }

    /// Index or re-index a single question.
    pub async fn index_question(&self, question: &Question) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        writer.delete_term(Term::from_field_text(self.fields.question_id, &question.id));
        writer.add_document(self.create_document(question))?;
        writer.commit()?;

        self.reader.reload()?;
        Ok(())
    }

    /// Remove questions from the index.
    pub async fn remove_questions(&self, question_ids: &[String]) -> Result<(), AppError> {
        if question_ids.is_empty() {
            return Ok(());
        }

        let mut writer = self.writer.write().await;
        for id in question_ids {
            writer.delete_term(Term::from_field_text(self.fields.question_id, id));
        }
        writer.commit()?;

        self.reader.reload()?;
        Ok(())
    }

    /// Search a college's questions, best match first.
    ///
    /// A zero `limit` or an `offset` at or past `MAX_SEARCH_WINDOW` yields no hits
    /// but still reports the total.
    pub fn search(
        &self,
        college_id: &str,
        query_str: &str,
        limit: usize,
        offset: usize,
    ) -> Result<SearchPage, AppError> {
        if query_str.trim().is_empty() {
            return Ok(SearchPage::default());
        }

        let searcher = self.reader.searcher();

        let field_queries = [
            (self.fields.question, BOOST_QUESTION),
            (self.fields.topics, BOOST_TOPICS),
            (self.fields.company, BOOST_COMPANY),
            (self.fields.description, BOOST_DESCRIPTION),
            (self.fields.hints, BOOST_HINTS),
        ];

        let mut text_queries: Vec<(Occur, Box<dyn tantivy::query::Query>)> = Vec::new();
        for (field, boost) in field_queries {
            let mut parser = QueryParser::for_index(&self.index, vec![field]);
            parser.set_conjunction_by_default();
            let (field_query, _errors) = parser.parse_query_lenient(query_str);
            text_queries.push((Occur::Should, Box::new(BoostQuery::new(field_query, boost))));
        }

        let college_query = tantivy::query::TermQuery::new(
            Term::from_field_text(self.fields.college_id, college_id),
            tantivy::schema::IndexRecordOption::Basic,
        );

        let query = BooleanQuery::new(vec![
            (Occur::Must, Box::new(college_query) as Box<dyn tantivy::query::Query>),
            (Occur::Must, Box::new(BooleanQuery::new(text_queries))),
        ]);

        if limit == 0 || offset >= MAX_SEARCH_WINDOW {
            let total = searcher
                .search(&query, &Count)
                .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;
            return Ok(SearchPage {
                hits: Vec::new(),
                total,
            });
        }

        let window = offset.saturating_add(limit).min(MAX_SEARCH_WINDOW);
        let (top_docs, total) = searcher
            .search(&query, &(TopDocs::with_limit(window), Count))
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let hits = top_docs
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|(score, doc_address)| {
                let doc: TantivyDocument = searcher.doc(doc_address).ok()?;
                let question_id = doc
                    .get_first(self.fields.question_id)?
                    .as_str()?
                    .to_string();
                Some(SearchResult { question_id, score })
            })
            .collect();

        Ok(SearchPage { hits, total })
    }

    fn create_document(&self, question: &Question) -> TantivyDocument {
        doc!(
            self.fields.question_id => question.id.clone(),
            self.fields.college_id => question.college_id.clone(),
            self.fields.question => question.question.clone(),
            self.fields.description => question.description.clone().unwrap_or_default(),
            self.fields.topics => question.topics.join(" "),
            self.fields.company => question.company.clone(),
            self.fields.hints => question.hints.as_ref().map(|h| h.join(" ")).unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, QuestionType};
    use tempfile::TempDir;

    fn question(id: &str, company: &str, text: &str, topics: &[&str]) -> Question {
        Question {
            id: id.to_string(),
            company_id: format!("company-{}", company),
            company: company.to_string(),
            college_id: "college-001".to_string(),
            year: 2023,
            question_type: QuestionType::Coding,
            round: None,
            question: text.to_string(),
            difficulty: Difficulty::Medium,
            topics: topics.iter().map(|t| t.to_string()).collect(),
            description: None,
            hints: None,
            solution: None,
            added_by: "admin-1".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_search_ranks_question_text() {
        let temp_dir = TempDir::new().unwrap();
        let index = QuestionIndex::open(temp_dir.path()).unwrap();

        index
            .rebuild(&[
                question("1", "Google", "Reverse a linked list", &["Linked Lists"]),
                question("2", "Microsoft", "Design a URL shortener", &["System Design"]),
            ])
            .await
            .unwrap();

        let page = index.search("college-001", "linked list", 10, 0).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.hits[0].question_id, "1");

        let page = index.search("college-001", "microsoft", 10, 0).unwrap();
        assert_eq!(page.hits[0].question_id, "2");

        assert_eq!(index.search("college-002", "linked", 10, 0).unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_reindex_and_remove() {
        let temp_dir = TempDir::new().unwrap();
        let index = QuestionIndex::open(temp_dir.path()).unwrap();

        index
            .index_question(&question("1", "Google", "Two sum", &["Arrays"]))
            .await
            .unwrap();
        index
            .index_question(&question("1", "Google", "Two sum", &["Hashing"]))
            .await
            .unwrap();
        assert_eq!(index.search("college-001", "sum", 10, 0).unwrap().hits.len(), 1);
        assert!(index.search("college-001", "arrays", 10, 0).unwrap().hits.is_empty());

        index.remove_questions(&["1".to_string()]).await.unwrap();
        assert!(index.search("college-001", "sum", 10, 0).unwrap().hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let temp_dir = TempDir::new().unwrap();
        let index = QuestionIndex::open(temp_dir.path()).unwrap();
        assert!(index.search("college-001", "  ", 10, 0).unwrap().hits.is_empty());
    }

    #[tokio::test]
    async fn test_total_counts_beyond_page() {
        let temp_dir = TempDir::new().unwrap();
        let index = QuestionIndex::open(temp_dir.path()).unwrap();

        index
            .rebuild(&[
                question("1", "Google", "Two sum", &["Arrays"]),
                question("2", "Amazon", "Three sum", &["Arrays"]),
                question("3", "Microsoft", "Design a URL shortener", &[]),
            ])
            .await
            .unwrap();

        let page = index.search("college-001", "sum", 1, 0).unwrap();
        assert_eq!(page.hits.len(), 1);
        assert_eq!(page.total, 2);

        let page = index.search("college-001", "sum", 1, 1).unwrap();
        assert_eq!(page.hits.len(), 1);
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_degenerate_paging_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let index = QuestionIndex::open(temp_dir.path()).unwrap();
        index
            .index_question(&question("1", "Google", "Two sum", &["Arrays"]))
            .await
            .unwrap();

        let page = index.search("college-001", "sum", 0, 0).unwrap();
        assert!(page.hits.is_empty());
        assert_eq!(page.total, 1);

        let page = index.search("college-001", "sum", 20, usize::MAX).unwrap();
        assert!(page.hits.is_empty());
        assert_eq!(page.total, 1);

        let page = index.search("college-001", "sum", usize::MAX, 0).unwrap();
        assert_eq!(page.hits.len(), 1);
    }
}
