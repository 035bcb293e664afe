//! Term extraction shared by indexing and querying.

/// Split on anything that is not a letter or digit and lowercase each term.
///
/// ```
/// use curso_core::search::tokenize::tokenize;
///
/// let terms: Vec<_> = tokenize("Pruebas con pytest, unittest/doctest").collect();
/// assert_eq!(terms, ["pruebas", "con", "pytest", "unittest", "doctest"]);
/// ```
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
}

/// Query terms in first-seen order, without repeats
pub fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in tokenize(query) {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}
