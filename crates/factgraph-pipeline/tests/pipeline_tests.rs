//! Pipeline Integration Tests
//!
//! Every text is served by a `PrecomputedParser`, so no parse service is
//! needed. Parses are written in the same JSON shape the service returns.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use factgraph_core::{Document, EntityType, FactGraphError, Triple};
use factgraph_graph::{NOT_FOUND, NOT_UNDERSTOOD};
use factgraph_pipeline::{Pipeline, PrecomputedParser};
use serde_json::{json, Value};

const OBAMA_TEXT: &str = "Barack Obama married Michelle. He met Michelle in Chicago.";
const MARRIED_QUESTION: &str = "Who is Barack Obama married to?";
const DIVORCED_QUESTION: &str = "Who is Barack Obama divorced from?";
const NOUN_PHRASE_QUESTION: &str = "Barack Obama";

/// Helper to build a token in the parse service's JSON shape
fn token(text: &str, lemma: &str, pos: &str, dep: &str, children: &[usize]) -> Value {
    json!({"text": text, "lemma": lemma, "pos": pos, "dep": dep, "children": children})
}

fn document(sentences: Vec<Vec<Value>>, entities: &[(&str, &str)]) -> Document {
    let value = json!({
        "sentences": sentences
            .into_iter()
            .map(|tokens| json!({"tokens": tokens}))
            .collect::<Vec<_>>(),
        "entities": entities
            .iter()
            .map(|(text, label)| json!({"text": text, "label": label}))
            .collect::<Vec<_>>(),
    });
    serde_json::from_value(value).unwrap()
}

fn obama_document() -> Document {
    document(
        vec![
            vec![
                token("Barack", "Barack", "PROPN", "compound", &[]),
                token("Obama", "Obama", "PROPN", "nsubj", &[0]),
                token("married", "marry", "VERB", "ROOT", &[1, 3, 4]),
                token("Michelle", "Michelle", "PROPN", "dobj", &[]),
                token(".", ".", "PUNCT", "punct", &[]),
            ],
            vec![
                token("He", "he", "PRON", "nsubj", &[]),
                token("met", "meet", "VERB", "ROOT", &[0, 2, 3, 5]),
                token("Michelle", "Michelle", "PROPN", "dobj", &[]),
                token("in", "in", "ADP", "prep", &[4]),
                token("Chicago", "Chicago", "PROPN", "pobj", &[]),
                token(".", ".", "PUNCT", "punct", &[]),
            ],
        ],
        &[
            ("Barack Obama", "PERSON"),
            ("Michelle", "PERSON"),
            ("Michelle", "PERSON"),
            ("Chicago", "GPE"),
        ],
    )
}

fn question_document(verb: &str, lemma: &str, prep: &str) -> Document {
    document(
        vec![vec![
            token("Who", "who", "PRON", "attr", &[]),
            token("is", "be", "AUX", "auxpass", &[]),
            token("Barack", "Barack", "PROPN", "compound", &[]),
            token("Obama", "Obama", "PROPN", "nsubj", &[2]),
            token(verb, lemma, "VERB", "ROOT", &[0, 1, 3, 5, 6]),
            token(prep, prep, "ADP", "prep", &[]),
            token("?", "?", "PUNCT", "punct", &[]),
        ]],
        &[("Barack Obama", "PERSON")],
    )
}

fn obama_pipeline() -> Pipeline {
    let parser = PrecomputedParser::new()
        .with_document(OBAMA_TEXT, obama_document())
        .with_document(MARRIED_QUESTION, question_document("married", "marry", "to"))
        .with_document(
            DIVORCED_QUESTION,
            question_document("divorced", "divorce", "from"),
        )
        .with_document(
            NOUN_PHRASE_QUESTION,
            document(
                vec![vec![
                    token("Barack", "Barack", "PROPN", "compound", &[]),
                    token("Obama", "Obama", "PROPN", "ROOT", &[0]),
                ]],
                &[("Barack Obama", "PERSON")],
            ),
        );
    Pipeline::new(Arc::new(parser))
}

// =============================================================================
// Analysis
// =============================================================================

#[test]
fn test_pronoun_subject_resolved_end_to_end() {
    let analysis = obama_pipeline().analyze(OBAMA_TEXT).unwrap();

    assert_eq!(
        analysis.output.triples,
        vec![
            Triple::new("Barack Obama", "marry", "Michelle"),
            Triple::new("Barack Obama", "meet", "Michelle"),
        ]
    );
}

#[test]
fn test_graph_contents() {
    let analysis = obama_pipeline().analyze(OBAMA_TEXT).unwrap();
    let graph = &analysis.graph;

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.node_type("Barack Obama"), Some(EntityType::Person));
    assert_eq!(graph.node_type("Chicago"), Some(EntityType::Gpe));

    // Same endpoints, different verbs: two edges
    assert_eq!(graph.edge_count(), 2);
    let labels: Vec<&str> = graph.edges_from("Barack Obama").iter().map(|e| e.label).collect();
    assert_eq!(labels, vec!["marry", "meet"]);
}

#[test]
fn test_entities_deduplicated_in_output() {
    let analysis = obama_pipeline().analyze(OBAMA_TEXT).unwrap();

    let json = serde_json::to_value(&analysis.output).unwrap();
    assert_eq!(json["entities"]["PERSON"], json!(["Barack Obama", "Michelle"]));
    assert_eq!(json["entities"]["GPE"], json!(["Chicago"]));
    assert_eq!(json["entities"]["ORG"], json!([]));
    assert_eq!(json["graph"]["edges"][1]["label"], "meet");
}

#[test]
fn test_long_object_truncated() {
    let text = "Obama signed the first major American health care reform bill in decades.";
    let parsed = document(
        vec![vec![
            token("Obama", "Obama", "PROPN", "nsubj", &[]),
            token("signed", "sign", "VERB", "ROOT", &[0, 9, 12]),
            token("the", "the", "DET", "det", &[]),
            token("first", "first", "ADJ", "amod", &[]),
            token("major", "major", "ADJ", "amod", &[]),
            token("American", "american", "ADJ", "amod", &[]),
            token("health", "health", "NOUN", "compound", &[]),
            token("care", "care", "NOUN", "compound", &[]),
            token("reform", "reform", "NOUN", "compound", &[]),
            token("bill", "bill", "NOUN", "dobj", &[2, 3, 4, 5, 6, 7, 8, 10]),
            token("in", "in", "ADP", "prep", &[11]),
            token("decades", "decade", "NOUN", "pobj", &[]),
            token(".", ".", "PUNCT", "punct", &[]),
        ]],
        &[("Obama", "PERSON")],
    );
    let pipeline = Pipeline::new(Arc::new(
        PrecomputedParser::new().with_document(text, parsed),
    ));

    let analysis = pipeline.analyze(text).unwrap();

    assert_eq!(
        analysis.output.triples,
        vec![Triple::new(
            "Obama",
            "sign",
            "the first major American health care reform bill..."
        )]
    );
}

#[test]
fn test_empty_object_on_unreliable_verb_dropped() {
    let text = "Obama said \"\". Obama visited \"\".";
    let parsed = document(
        vec![
            vec![
                token("Obama", "Obama", "PROPN", "nsubj", &[]),
                token("said", "say", "VERB", "ROOT", &[0, 2, 3]),
                token("\"\"", "\"\"", "PUNCT", "dobj", &[]),
                token(".", ".", "PUNCT", "punct", &[]),
            ],
            vec![
                token("Obama", "Obama", "PROPN", "nsubj", &[]),
                token("visited", "visit", "VERB", "ROOT", &[0, 2, 3]),
                token("\"\"", "\"\"", "PUNCT", "dobj", &[]),
                token(".", ".", "PUNCT", "punct", &[]),
            ],
        ],
        &[("Obama", "PERSON")],
    );
    let pipeline = Pipeline::new(Arc::new(
        PrecomputedParser::new().with_document(text, parsed),
    ));

    let analysis = pipeline.analyze(text).unwrap();

    assert_eq!(
        analysis.output.triples,
        vec![Triple::new("Obama", "visit", "(unspecified)")]
    );
}

#[test]
fn test_date_entities_classified() {
    let text = "Obama won in November 4 2008.";
    let parsed = document(
        vec![vec![
            token("Obama", "Obama", "PROPN", "ROOT", &[]),
        ]],
        &[
            ("Obama", "PERSON"),
            ("2008", "DATE"),
            ("November 4", "DATE"),
            ("next year", "DATE"),
            ("the 1990s", "DATE"),
            ("Democrats", "NORP"),
        ],
    );
    let pipeline = Pipeline::new(Arc::new(
        PrecomputedParser::new().with_document(text, parsed),
    ));

    let output = pipeline.analyze(text).unwrap().output;
    let classes = serde_json::to_value(&output.date_classes).unwrap();

    assert_eq!(classes["2008"], "Year");
    assert_eq!(classes["November 4"], "Month and Day");
    assert_eq!(classes["next year"], "Relative Date");
    assert_eq!(classes["the 1990s"], "Unknown");
    assert!(output.triples.is_empty());
    assert_eq!(output.graph.nodes.len(), 5);
}

#[test]
fn test_missing_parse_is_parser_error() {
    let result = obama_pipeline().analyze("Some text nobody parsed.");
    assert!(matches!(result, Err(FactGraphError::Parser(_))));
}

#[test]
fn test_cyclic_parse_rejected() {
    let text = "Obama met Biden.";
    let parsed = document(
        vec![vec![
            token("Obama", "Obama", "PROPN", "nsubj", &[1]),
            token("met", "meet", "VERB", "ROOT", &[0, 2]),
            token("Biden", "Biden", "PROPN", "dobj", &[]),
        ]],
        &[],
    );
    let pipeline = Pipeline::new(Arc::new(
        PrecomputedParser::new().with_document(text, parsed),
    ));

    assert!(matches!(
        pipeline.analyze(text),
        Err(FactGraphError::ParserContract(_))
    ));
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_query_finds_spouse() {
    let pipeline = obama_pipeline();
    let analysis = pipeline.analyze(OBAMA_TEXT).unwrap();

    let answers = pipeline.answer(&analysis.graph, MARRIED_QUESTION).unwrap();

    assert_eq!(answers, vec!["Michelle"]);
}

#[test]
fn test_query_without_match() {
    let pipeline = obama_pipeline();
    let analysis = pipeline.analyze(OBAMA_TEXT).unwrap();

    let answers = pipeline.answer(&analysis.graph, DIVORCED_QUESTION).unwrap();

    assert_eq!(answers, vec![NOT_FOUND]);
}

#[test]
fn test_query_without_verb() {
    let pipeline = obama_pipeline();
    let analysis = pipeline.analyze(OBAMA_TEXT).unwrap();

    let answers = pipeline.answer(&analysis.graph, NOUN_PHRASE_QUESTION).unwrap();

    assert_eq!(answers, vec![NOT_UNDERSTOOD]);
}

#[test]
fn test_blank_question_rejected() {
    let pipeline = obama_pipeline();
    let analysis = pipeline.analyze(OBAMA_TEXT).unwrap();

    assert!(matches!(
        pipeline.answer(&analysis.graph, "   "),
        Err(FactGraphError::EmptyInput)
    ));
}
