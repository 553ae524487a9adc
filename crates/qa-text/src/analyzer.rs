use tantivy::tokenizer::{SimpleTokenizer, StopWordFilter, TextAnalyzer, TokenStream};

/// Splits normalized text into n-gram terms.
///
/// Tokens are maximal alphanumeric runs. Stop words are removed from the
/// unigrams only; longer n-grams are formed over the unfiltered tokens, so
/// questions that differ only in function words stay distinct. A text made
/// only of stop words keeps its unfiltered unigrams.
#[derive(Clone)]
pub struct TermAnalyzer {
    filtered: TextAnalyzer,
    plain: TextAnalyzer,
    ngram_range: (usize, usize),
}

impl TermAnalyzer {
    pub fn new(stop_words: &[String], ngram_range: (usize, usize)) -> Self {
        let filtered = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(StopWordFilter::remove(stop_words.iter().cloned()))
            .build();
        let plain = TextAnalyzer::builder(SimpleTokenizer::default()).build();
        Self { filtered, plain, ngram_range }
    }

    /// Every token of already-normalized text, stop words included.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        // TextAnalyzer streams need `&mut`; cloning keeps concurrent callers independent.
        run(&mut self.plain.clone(), text)
    }

    /// Content-word unigrams, or all tokens when every token is a stop word.
    pub fn unigrams(&self, text: &str) -> Vec<String> {
        let content = run(&mut self.filtered.clone(), text);
        if content.is_empty() { self.tokens(text) } else { content }
    }

    /// All n-grams in the configured range, space-joined, in text order.
    pub fn terms(&self, text: &str) -> Vec<String> {
        let (lo, hi) = self.ngram_range;
        let mut terms = Vec::new();
        if lo <= 1 && hi >= 1 {
            terms.extend(self.unigrams(text));
        }
        if hi < 2 {
            return terms;
        }
        let tokens = self.tokens(text);
        for n in lo.max(2)..=hi {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }
}

fn run(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut stream = analyzer.token_stream(text);
    stream.process(&mut |token| out.push(token.text.clone()));
    out
}
