use std::fs;
use tempfile::TempDir;

use qa_core::config::LexicalConfig;
use qa_core::traits::QuestionMatcher;
use qa_core::{Corpus, Error};
use qa_text::{normalize, LexicalEngine};

fn trained(pairs: &[(&str, &str)]) -> LexicalEngine {
    let mut engine = LexicalEngine::new(LexicalConfig::default()).expect("config");
    engine.load(Corpus::from_pairs(pairs.iter().copied())).expect("load");
    engine.train().expect("train");
    engine
}

fn faq() -> Vec<(&'static str, &'static str)> {
    vec![
        ("AI là gì?", "AI là trí tuệ nhân tạo."),
        ("Chatbot hoạt động như thế nào?", "Chatbot so khớp câu hỏi với dữ liệu mẫu."),
        ("Trí tuệ nhân tạo được ứng dụng ở đâu?", "Y tế, giáo dục, tài chính và nhiều lĩnh vực khác."),
        ("Làm sao để xây dựng chatbot?", "Thu thập dữ liệu hỏi đáp rồi huấn luyện mô hình."),
        ("Học máy là gì?", "Học máy là một nhánh của trí tuệ nhân tạo."),
    ]
}

#[test]
fn single_entry_corpus_answers_its_own_question() {
    let engine = trained(&[("AI là gì?", "AI là trí tuệ nhân tạo.")]);
    let hits = engine.find("AI là gì", 1).expect("find");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].answer, "AI là trí tuệ nhân tạo.");
    assert!(hits[0].score > 0.1, "score {}", hits[0].score);
    assert_eq!(engine.answer("AI là gì"), "AI là trí tuệ nhân tạo.");
}

#[test]
fn unrelated_question_gets_fallback() {
    let engine = trained(&[("AI là gì?", "AI là trí tuệ nhân tạo.")]);
    assert!(engine.find("Hôm nay ăn gì?", 1).expect("find").is_empty());
    assert_eq!(engine.answer("Hôm nay ăn gì?"), LexicalConfig::default().fallback_answer);
}

#[test]
fn every_stored_question_matches_itself() {
    let pairs = faq();
    let engine = trained(&pairs);
    for (q, a) in &pairs {
        let hits = engine.find(q, 1).expect("find");
        assert_eq!(hits.len(), 1, "no match for {q}");
        assert_eq!(hits[0].matched_question, *q);
        assert_eq!(hits[0].answer, *a);
        assert!(hits[0].score >= engine.config().similarity_threshold);
    }
}

#[test]
fn accent_free_and_reordered_whitespace_queries_still_match() {
    let engine = trained(&faq());
    let hits = engine.find("  chatbot   HOAT dong nhu the nao ", 1).expect("find");
    assert_eq!(hits[0].matched_question, "Chatbot hoạt động như thế nào?");
}

#[test]
fn empty_and_whitespace_queries_return_no_match() {
    let engine = trained(&faq());
    for q in ["", "   ", "\t\n", "?!"] {
        assert!(engine.find(q, 3).expect("find").is_empty(), "query {q:?}");
    }
}

#[test]
fn results_are_ranked_and_capped() {
    let engine = trained(&faq());
    let hits = engine.find("trí tuệ nhân tạo", 5).expect("find");
    assert!(!hits.is_empty() && hits.len() <= 5);
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    assert!(hits.iter().all(|h| h.score >= 0.1));
    assert_eq!(engine.find("trí tuệ nhân tạo", 1).expect("find").len(), 1);
}

#[test]
fn ties_resolve_to_lower_corpus_index() {
    let engine = trained(&[("mạng nơ ron", "first"), ("thị giác máy tính", "other"), ("mạng nơ ron", "second")]);
    let hits = engine.find("mạng nơ ron", 2).expect("find");
    assert_eq!(hits[0].answer, "first");
    assert_eq!(hits[1].answer, "second");
}

#[test]
fn threshold_is_a_hard_floor() {
    let config = LexicalConfig { similarity_threshold: 0.99, ..LexicalConfig::default() };
    let mut engine = LexicalEngine::new(config).expect("config");
    engine.load(Corpus::from_pairs(faq())).expect("load");
    engine.train().expect("train");
    assert!(engine.find("trí tuệ nhân tạo ở đâu trong y tế", 5).expect("find").is_empty());
}

#[test]
fn out_of_order_calls_fail_with_lifecycle_errors() {
    let mut engine = LexicalEngine::new(LexicalConfig::default()).expect("config");
    assert!(matches!(engine.train(), Err(Error::NotLoaded)));
    assert!(matches!(engine.find("AI", 1), Err(Error::NotTrained)));
    engine.load(Corpus::from_pairs(faq())).expect("load");
    assert!(matches!(engine.find("AI", 1), Err(Error::NotTrained)));
    assert_eq!(engine.answer("AI là gì?"), engine.config().fallback_answer);
}

#[test]
fn empty_corpus_leaves_engine_unbuilt_and_retryable() {
    let mut engine = LexicalEngine::new(LexicalConfig::default()).expect("config");
    assert!(matches!(engine.load(Corpus::from_pairs([("", "x")])), Err(Error::EmptyCorpus)));
    assert!(!engine.is_loaded());
    engine.load(Corpus::from_pairs(faq())).expect("retry");
    engine.train().expect("train");
    assert!(engine.is_trained());
}

#[test]
fn load_path_reports_data_source_errors() {
    let tmp = TempDir::new().unwrap();
    let mut engine = LexicalEngine::new(LexicalConfig::default()).expect("config");
    let err = engine.load_path(&tmp.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, Error::DataSource(_)));

    let path = tmp.path().join("faq.csv");
    fs::write(&path, "question,answer\nAI là gì?,AI là trí tuệ nhân tạo.\n").unwrap();
    engine.load_path(&path).expect("load");
    engine.train().expect("train");
    assert_eq!(engine.answer("ai la gi"), "AI là trí tuệ nhân tạo.");
}

#[test]
fn training_twice_is_deterministic() {
    let mut a = trained(&faq());
    let b = trained(&faq());
    a.train().expect("retrain");
    for q in ["chatbot", "trí tuệ nhân tạo ứng dụng", "học máy"] {
        assert_eq!(a.find(q, 5).expect("a"), b.find(q, 5).expect("b"));
    }
}

#[test]
fn best_match_goes_through_the_matcher_interface() {
    let engine = trained(&faq());
    let matcher: &dyn QuestionMatcher = &engine;
    let best = matcher.best_match("Học máy là gì").expect("match").expect("some");
    assert_eq!(best.matched_question, "Học máy là gì?");
    assert!(matcher.best_match("xyz").expect("no error").is_none());
    assert_eq!(matcher.corpus().expect("corpus").len(), 5);
}

#[test]
fn normalizer_is_deterministic() {
    assert_eq!(normalize("Ứng   dụng"), normalize("Ứng   dụng"));
    assert_eq!(normalize("Ứng dụng"), "ung dung");
}

#[test]
fn questions_differing_only_in_function_words_stay_distinct() {
    let engine = trained(&[
        ("Chatbot là gì?", "Định nghĩa chatbot."),
        ("Chatbot như thế nào?", "Cách chatbot hoạt động."),
        ("AI là gì?", "AI là trí tuệ nhân tạo."),
    ]);
    for (q, a) in [("Chatbot như thế nào?", "Cách chatbot hoạt động."), ("Chatbot là gì?", "Định nghĩa chatbot.")] {
        let hits = engine.find(q, 2).expect("find");
        assert_eq!(hits[0].matched_question, q);
        assert_eq!(hits[0].answer, a);
        assert!(hits.len() < 2 || hits[0].score > hits[1].score, "{hits:?}");
    }
}

#[test]
fn two_questions_sharing_their_only_content_word_keep_a_vocabulary() {
    let engine = trained(&[("Chatbot là gì?", "Định nghĩa chatbot."), ("Chatbot như thế nào?", "Cách chatbot hoạt động.")]);
    assert!(engine.vocabulary_len().unwrap_or(0) > 0);
    let hits = engine.find("Chatbot là gì?", 1).expect("find");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].matched_question, "Chatbot là gì?");
    assert_eq!(engine.answer("Chatbot như thế nào?"), "Cách chatbot hoạt động.");
}
