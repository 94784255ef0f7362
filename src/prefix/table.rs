//! Prefix table extraction
//!
//! Declarations are only recognised in the contiguous run of `PREFIX` lines at
//! the top of a document. This is a line scanner, not a SPARQL parser: the
//! first line that is not a declaration ends the block.

use std::collections::HashMap;

use tracing::{trace, warn};

const DECLARATION_KEYWORD: &str = "PREFIX";

/// A single `PREFIX name: <namespace>` binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixDeclaration {
    /// Prefix name as written, including its trailing colon (e.g. `foaf:`)
    pub name: String,
    /// Namespace URI with its surrounding delimiters removed
    pub namespace: String,
}

/// A declaration-keyword line with fewer than three space-separated fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed prefix declaration on line {line}: {text:?}")]
pub struct MalformedDeclaration {
    /// Zero-based index among the non-empty lines of the document
    pub line: usize,
    pub text: String,
}

/// Ordered mapping from prefix name to namespace URI.
///
/// Iteration follows declaration order. Re-declaring a name replaces its
/// namespace but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixTable {
    declarations: Vec<PrefixDeclaration>,
    index: HashMap<String, usize>,
}

impl PrefixTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, declaration: PrefixDeclaration) {
        match self.index.get(&declaration.name) {
            Some(&slot) => self.declarations[slot].namespace = declaration.namespace,
            None => {
                self.index.insert(declaration.name.clone(), self.declarations.len());
                self.declarations.push(declaration);
            }
        }
    }

    /// Returns the namespace bound to `name` (e.g. `foaf:`).
    pub fn namespace(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&slot| self.declarations[slot].namespace.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrefixDeclaration> {
        self.declarations.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().map(|d| d.name.as_str())
    }
}

/// Result of scanning the leading declaration block of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixExtraction {
    pub table: PrefixTable,
    /// Declaration lines that were skipped because they had too few fields
    pub malformed: Vec<MalformedDeclaration>,
    /// Number of lines (as yielded by [`split_lines`]) in the declaration block
    pub declaration_lines: usize,
}

/// Splits document text into lines, treating any run of `\r` and `\n` as a
/// single separator. Blank lines are therefore never yielded.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\r', '\n']).filter(|line| !line.is_empty())
}

/// True when the first six characters of `line` are `PREFIX`, ignoring case.
pub fn is_declaration_line(line: &str) -> bool {
    line.get(..DECLARATION_KEYWORD.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(DECLARATION_KEYWORD))
}

/// Parses `PREFIX name: <namespace>` into a declaration.
///
/// Fields are separated by single spaces. The third field loses its first and
/// last character, which are taken to be `<`/`>` or quote delimiters.
/// Returns `None` when the line has fewer than three fields or an empty name.
pub fn parse_declaration(line: &str) -> Option<PrefixDeclaration> {
    let mut fields = line.split(' ');
    let _keyword = fields.next()?;
    let name = fields.next().filter(|name| !name.is_empty())?;
    let delimited = fields.next()?;

    let mut inner = delimited.chars();
    inner.next();
    inner.next_back();

    Some(PrefixDeclaration {
        name: name.to_string(),
        namespace: inner.as_str().to_string(),
    })
}

/// Builds the prefix table from the leading declaration block of `text`.
///
/// Malformed declaration lines are skipped with a warning; they still count
/// as part of the block, so the scan continues past them.
pub fn extract_prefix_table(text: &str) -> PrefixExtraction {
    let mut extraction = PrefixExtraction::default();

    for (line_index, line) in split_lines(text).enumerate() {
        if !is_declaration_line(line) {
            break;
        }
        extraction.declaration_lines += 1;

        match parse_declaration(line) {
            Some(declaration) => {
                trace!("Declared prefix {} -> {}", declaration.name, declaration.namespace);
                extraction.table.insert(declaration);
            }
            None => {
                let malformed = MalformedDeclaration {
                    line: line_index,
                    text: line.to_string(),
                };
                warn!("{}", malformed);
                extraction.malformed.push(malformed);
            }
        }
    }

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use quickcheck::{QuickCheck, TestResult};

    fn pairs(table: &PrefixTable) -> Vec<(&str, &str)> {
        table
            .iter()
            .map(|d| (d.name.as_str(), d.namespace.as_str()))
            .collect()
    }

    #[test]
    fn test_extracts_declarations_in_order() {
        let text = indoc! {r#"
            PREFIX foaf: <http://xmlns.com/foaf/0.1/>
            PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
            SELECT ?name WHERE { ?s foaf:name ?name }
        "#};

        let extraction = extract_prefix_table(text);
        assert_eq!(
            pairs(&extraction.table),
            vec![
                ("foaf:", "http://xmlns.com/foaf/0.1/"),
                ("rdf:", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
            ]
        );
        assert_eq!(extraction.declaration_lines, 2);
        assert!(extraction.malformed.is_empty());
    }

    #[test]
    fn test_stops_at_first_non_declaration_line() {
        let text = indoc! {r#"
            PREFIX foaf: <http://xmlns.com/foaf/0.1/>
            SELECT * WHERE { ?s ?p ?o }
            PREFIX dc: <http://purl.org/dc/elements/1.1/>
        "#};

        let extraction = extract_prefix_table(text);
        assert_eq!(pairs(&extraction.table), vec![("foaf:", "http://xmlns.com/foaf/0.1/")]);
        assert!(!extraction.table.contains("dc:"));
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        let text = "prefix ex: <http://example.org/>\nPrefix schema: <http://schema.org/>\n";
        let extraction = extract_prefix_table(text);
        assert_eq!(extraction.table.namespace("ex:"), Some("http://example.org/"));
        assert_eq!(extraction.table.namespace("schema:"), Some("http://schema.org/"));
    }

    #[test]
    fn test_blank_lines_and_crlf_do_not_end_block() {
        let text = "PREFIX a: <http://a/>\r\n\r\n\nPREFIX b: <http://b/>\r\nASK {}";
        let extraction = extract_prefix_table(text);
        assert_eq!(extraction.table.len(), 2);
        assert_eq!(extraction.declaration_lines, 2);
    }

    #[test]
    fn test_malformed_declaration_is_skipped_and_reported() {
        let text = "PREFIX foaf:\nPREFIX dc: <http://purl.org/dc/elements/1.1/>\nSELECT 1";
        let extraction = extract_prefix_table(text);

        assert_eq!(pairs(&extraction.table), vec![("dc:", "http://purl.org/dc/elements/1.1/")]);
        assert_eq!(
            extraction.malformed,
            vec![MalformedDeclaration { line: 0, text: "PREFIX foaf:".to_string() }]
        );
        assert_eq!(extraction.declaration_lines, 2);
    }

    #[test]
    fn test_redeclaration_keeps_position() {
        let text = "PREFIX a: <http://one/>\nPREFIX b: <http://b/>\nPREFIX a: <http://two/>";
        let extraction = extract_prefix_table(text);
        assert_eq!(pairs(&extraction.table), vec![("a:", "http://two/"), ("b:", "http://b/")]);
    }

    #[test]
    fn test_parse_declaration_strips_delimiters() {
        let decl = parse_declaration("PREFIX owl: \"http://www.w3.org/2002/07/owl#\"").unwrap();
        assert_eq!(decl.name, "owl:");
        assert_eq!(decl.namespace, "http://www.w3.org/2002/07/owl#");

        assert_eq!(parse_declaration("PREFIX"), None);
        assert_eq!(parse_declaration("PREFIX  <http://x/>"), None);
    }

    #[test]
    fn test_declaration_keyword_needs_six_ascii_chars() {
        assert!(is_declaration_line("PREFIX x: <y>"));
        assert!(!is_declaration_line("PREFI"));
        assert!(!is_declaration_line("SELECT"));
        assert!(!is_declaration_line("préfix x: <y>"));
    }

    #[test]
    fn test_extraction_matches_generated_declarations() {
        fn prop(bindings: Vec<(String, String)>) -> TestResult {
            let mut expected = Vec::new();
            let mut text = String::new();
            for (i, (name, namespace)) in bindings.iter().enumerate() {
                let name: String = name.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
                let namespace: String = namespace.chars().filter(|c| !c.is_whitespace()).collect();
                let name = format!("{}{}:", name, i);
                text.push_str(&format!("PREFIX {} <{}>\n", name, namespace));
                expected.push((name, namespace));
            }
            text.push_str("SELECT * WHERE { ?s ?p ?o }\nPREFIX late: <http://late.example/>\n");

            let extraction = extract_prefix_table(&text);
            let actual: Vec<(String, String)> = extraction
                .table
                .iter()
                .map(|d| (d.name.clone(), d.namespace.clone()))
                .collect();

            TestResult::from_bool(actual == expected && !extraction.table.contains("late:"))
        }

        QuickCheck::new().quickcheck(prop as fn(Vec<(String, String)>) -> TestResult);
    }
}
