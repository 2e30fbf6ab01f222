//! Vocabulary-shortening policy.
//!
//! When RDF is materialized in the property graph, namespace IRIs are
//! shortened so relationship types, labels, and property keys stay readable:
//! `http://www.w3.org/2000/01/rdf-schema#label` becomes `rdfs__label`.
//! Namespaces without a known or declared prefix get generated ones
//! (`ns0`, `ns1`, ...) in order of first use.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rdf::ns;

/// Separator between prefix and local name in shortened names.
pub const SEPARATOR: &str = "__";

/// How vocabulary IRIs are turned into graph names.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum VocabUris {
    /// `prefix__local`
    #[default]
    Shorten,
    /// Full IRI kept as the name.
    Keep,
    /// Local name only; the namespace is dropped.
    Ignore,
}

impl VocabUris {
    fn as_str(self) -> &'static str {
        match self {
            Self::Shorten => "SHORTEN",
            Self::Keep => "KEEP",
            Self::Ignore => "IGNORE",
        }
    }
}

/// Graph configuration applied once per store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VocabularyPolicy {
    pub handle_vocab_uris: VocabUris,
    pub keep_lang_tag: bool,
    pub types_to_labels: bool,
}

impl Default for VocabularyPolicy {
    fn default() -> Self {
        Self {
            handle_vocab_uris: VocabUris::Shorten,
            keep_lang_tag: false,
            types_to_labels: true,
        }
    }
}

impl VocabularyPolicy {
    /// Render as the Cypher map literal accepted by `n10s.graphconfig.init`.
    /// Every value comes from this enum/bool set, never from caller input.
    pub fn cypher_map(&self) -> String {
        format!(
            "{{handleVocabUris: \"{}\", keepLangTag: {}, typesToLabels: {}}}",
            self.handle_vocab_uris.as_str(),
            self.keep_lang_tag,
            self.types_to_labels
        )
    }
}

/// Prefixes recognized without being declared by the document.
const KNOWN_PREFIXES: &[(&str, &str)] = &[
    ("rdf", ns::RDF),
    ("rdfs", ns::RDFS),
    ("owl", ns::OWL),
    ("xsd", ns::XSD),
    ("sh", ns::SH),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("dct", "http://purl.org/dc/terms/"),
    ("sch", "http://schema.org/"),
];

/// Stateful IRI shortener. Generated prefixes are stable for the lifetime of
/// the shortener.
#[derive(Debug, Clone)]
pub struct Shortener {
    mode: VocabUris,
    /// namespace IRI -> prefix
    by_namespace: BTreeMap<String, String>,
    generated: usize,
}

impl Shortener {
    pub fn new(mode: VocabUris) -> Self {
        let by_namespace = KNOWN_PREFIXES
            .iter()
            .map(|(p, iri)| ((*iri).to_string(), (*p).to_string()))
            .collect();
        Self {
            mode,
            by_namespace,
            generated: 0,
        }
    }

    /// Register prefixes declared by a document. Known namespaces keep their
    /// standard prefix; the empty prefix is ignored.
    pub fn declare<'a>(&mut self, prefixes: impl IntoIterator<Item = (&'a String, &'a String)>) {
        for (prefix, iri) in prefixes {
            if prefix.is_empty() {
                continue;
            }
            self.by_namespace
                .entry(iri.clone())
                .or_insert_with(|| prefix.clone());
        }
    }

    /// Shorten an IRI according to the configured mode.
    pub fn shorten(&mut self, iri: &str) -> String {
        let (namespace, local) = split_iri(iri);
        match self.mode {
            VocabUris::Keep => iri.to_string(),
            VocabUris::Ignore => local.to_string(),
            VocabUris::Shorten if namespace.is_empty() => local.to_string(),
            VocabUris::Shorten => {
                let prefix = match self.by_namespace.get(namespace) {
                    Some(p) => p.clone(),
                    None => {
                        let p = format!("ns{}", self.generated);
                        self.generated += 1;
                        self.by_namespace.insert(namespace.to_string(), p.clone());
                        p
                    }
                };
                format!("{prefix}{SEPARATOR}{local}")
            }
        }
    }
}

/// Split an IRI into namespace and local name at the last `#`, `/` or `:`.
pub fn split_iri(iri: &str) -> (&str, &str) {
    match iri.rfind(['#', '/', ':']) {
        Some(i) if i + 1 < iri.len() => iri.split_at(i + 1),
        _ => ("", iri),
    }
}
