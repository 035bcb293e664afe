//! Inverted index with BM25+ ranking, prefix and fuzzy term expansion.
//!
//! The layout is term -> field -> document -> term frequency. Every map is a
//! `BTreeMap`, so serializing the same records twice yields the same bytes.

use super::fuzzy::bounded_distance;
use super::tokenize::{query_terms, tokenize};
use super::{SearchConfig, SearchError, SearchOptions, SearchRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::Bound;

const BM25_K: f64 = 1.2;
const BM25_B: f64 = 0.7;
const BM25_D: f64 = 0.5;

const PREFIX_WEIGHT: f64 = 0.375;
const FUZZY_WEIGHT: f64 = 0.45;
const MAX_FUZZY_DISTANCE: usize = 6;

type Postings = BTreeMap<usize, BTreeMap<usize, u32>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextIndex {
    fields: Vec<String>,
    document_ids: Vec<String>,
    /// Token count per document, per field
    field_lengths: Vec<Vec<usize>>,
    /// Token count per field over all documents
    total_field_lengths: Vec<usize>,
    stored: Vec<BTreeMap<String, Value>>,
    terms: BTreeMap<String, Postings>,
}

/// One ranked document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: String,
    pub score: f64,
    /// Index terms that matched (after prefix/fuzzy expansion)
    pub terms: Vec<String>,
    /// Query terms that found this document
    pub query_terms: Vec<String>,
    pub stored: BTreeMap<String, Value>,
}

impl SearchHit {
    fn stored_str(&self, key: &str) -> Option<&str> {
        self.stored.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.stored_str("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.stored_str("description")
    }

    pub fn href(&self) -> Option<&str> {
        self.stored_str("href")
    }

    pub fn section(&self) -> Option<&str> {
        self.stored_str("section")
    }
}

#[derive(Debug, Default)]
struct Match {
    score: f64,
    terms: Vec<String>,
    query_terms: Vec<String>,
}

impl TextIndex {
    /// Index `records` over `config.fields`, keeping `config.store_fields`.
    pub fn build(config: &SearchConfig, records: &[SearchRecord]) -> Result<Self, SearchError> {
        for field in config.fields.iter().chain(&config.store_fields) {
            if !SearchRecord::FIELDS.contains(&field.as_str()) {
                return Err(SearchError::UnknownField(field.clone()));
            }
        }

        let mut index = TextIndex {
            fields: config.fields.clone(),
            document_ids: Vec::with_capacity(records.len()),
            field_lengths: Vec::with_capacity(records.len()),
            total_field_lengths: vec![0; config.fields.len()],
            stored: Vec::with_capacity(records.len()),
            terms: BTreeMap::new(),
        };

        for (doc, record) in records.iter().enumerate() {
            let mut lengths = Vec::with_capacity(config.fields.len());

            for (field_id, field) in config.fields.iter().enumerate() {
                let text = record.field_text(field).unwrap_or_default();
                let mut count = 0;
                for term in tokenize(&text) {
                    count += 1;
                    *index
                        .terms
                        .entry(term)
                        .or_default()
                        .entry(field_id)
                        .or_default()
                        .entry(doc)
                        .or_insert(0) += 1;
                }
                lengths.push(count);
                index.total_field_lengths[field_id] += count;
            }

            let stored = config
                .store_fields
                .iter()
                .filter_map(|field| Some((field.clone(), record.stored_value(field)?)))
                .collect();

            index.document_ids.push(record.id.clone());
            index.field_lengths.push(lengths);
            index.stored.push(stored);
        }

        Ok(index)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn document_count(&self) -> usize {
        self.document_ids.len()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Check that every table agrees on the number of documents and fields,
    /// so that ranking never indexes out of bounds.
    pub fn validate(&self) -> Result<(), SearchError> {
        let docs = self.document_ids.len();
        let fields = self.fields.len();

        if self.field_lengths.len() != docs || self.stored.len() != docs {
            return Err(SearchError::CorruptIndex(format!(
                "{} documents but {} field length rows and {} stored rows",
                docs,
                self.field_lengths.len(),
                self.stored.len()
            )));
        }
        if self.total_field_lengths.len() != fields {
            return Err(SearchError::CorruptIndex(format!(
                "{} fields but {} field length totals",
                fields,
                self.total_field_lengths.len()
            )));
        }
        if let Some(doc) = self.field_lengths.iter().position(|row| row.len() != fields) {
            return Err(SearchError::CorruptIndex(format!(
                "document {} has {} field lengths, expected {}",
                doc,
                self.field_lengths[doc].len(),
                fields
            )));
        }

        for (term, postings) in &self.terms {
            for (&field_id, entries) in postings {
                if field_id >= fields {
                    return Err(SearchError::CorruptIndex(format!(
                        "term {:?} refers to field {}",
                        term, field_id
                    )));
                }
                if let Some(&doc) = entries.keys().find(|&&doc| doc >= docs) {
                    return Err(SearchError::CorruptIndex(format!(
                        "term {:?} refers to document {}",
                        term, doc
                    )));
                }
            }
        }

        Ok(())
    }

    /// Ranked hits for `query`, best first; equal scores keep index order.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchHit> {
        let mut matches: BTreeMap<usize, Match> = BTreeMap::new();

        for query_term in query_terms(query) {
            for (term, weight) in self.expand(&query_term, options) {
                let Some(postings) = self.terms.get(term) else {
                    continue;
                };
                for (&field_id, docs) in postings {
                    let boost = self
                        .fields
                        .get(field_id)
                        .and_then(|field| options.boost.get(field))
                        .copied()
                        .unwrap_or(1.0);

                    for (&doc, &frequency) in docs {
                        let score = weight * boost * self.bm25(field_id, doc, frequency, docs.len());
                        let entry = matches.entry(doc).or_default();
                        entry.score += score;
                        push_unique(&mut entry.terms, term);
                        push_unique(&mut entry.query_terms, &query_term);
                    }
                }
            }
        }

        let mut hits: Vec<SearchHit> = matches
            .into_iter()
            .map(|(doc, found)| SearchHit {
                id: self.document_ids[doc].clone(),
                score: found.score * found.query_terms.len() as f64,
                terms: found.terms,
                query_terms: found.query_terms,
                stored: self.stored[doc].clone(),
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits
    }

    /// Index terms a query term reaches, with their weight. Each index term
    /// appears once, as its best kind of match (exact, prefix, fuzzy).
    fn expand<'a>(&'a self, query_term: &str, options: &SearchOptions) -> Vec<(&'a str, f64)> {
        let mut expansions = Vec::new();
        let query_len = query_term.chars().count();

        if let Some((term, _)) = self.terms.get_key_value(query_term) {
            expansions.push((term.as_str(), 1.0));
        }

        if options.prefix {
            for term in self
                .terms
                .range::<str, _>((Bound::Excluded(query_term), Bound::Unbounded))
                .map(|(term, _)| term)
                .take_while(|term| term.starts_with(query_term))
            {
                let len = term.chars().count() as f64;
                let distance = len - query_len as f64;
                expansions.push((term.as_str(), PREFIX_WEIGHT * len / (len + 0.3 * distance)));
            }
        }

        let max_distance = if options.fuzzy > 0.0 {
            ((options.fuzzy * query_len as f64).round() as usize).min(MAX_FUZZY_DISTANCE)
        } else {
            0
        };

        if max_distance > 0 {
            for term in self.terms.keys() {
                if term == query_term || (options.prefix && term.starts_with(query_term)) {
                    continue;
                }
                if let Some(distance) = bounded_distance(query_term, term, max_distance) {
                    let len = term.chars().count() as f64;
                    expansions.push((term.as_str(), FUZZY_WEIGHT * len / (len + distance as f64)));
                }
            }
        }

        expansions
    }

    fn bm25(&self, field_id: usize, doc: usize, frequency: u32, matching_docs: usize) -> f64 {
        let total_docs = self.document_ids.len() as f64;
        let matching = matching_docs as f64;
        let idf = (1.0 + (total_docs - matching + 0.5) / (matching + 0.5)).ln();

        let length = self.field_lengths[doc][field_id] as f64;
        let average = self.total_field_lengths[field_id] as f64 / total_docs;
        let frequency = frequency as f64;

        idf * (BM25_D
            + frequency * (BM25_K + 1.0)
                / (frequency + BM25_K * (1.0 - BM25_B + BM25_B * length / average)))
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}
