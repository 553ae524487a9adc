use tokenizers::normalizers::{Lowercase, StripAccents, NFD};
use tokenizers::{NormalizedString, Normalizer};

/// Canonical form used for lexical comparison.
///
/// Lowercases, decomposes to NFD and drops combining marks (so `"Trí tuệ"`
/// becomes `"tri tue"`), then collapses whitespace runs to single spaces and
/// trims. Pure and deterministic. If the normalizer pipeline fails the input
/// is returned unchanged.
pub fn normalize(text: &str) -> String {
    let mut normalized = NormalizedString::from(text);
    let stripped = Lowercase
        .normalize(&mut normalized)
        .and_then(|()| NFD.normalize(&mut normalized))
        .and_then(|()| StripAccents.normalize(&mut normalized));
    match stripped {
        Ok(()) => collapse_whitespace(normalized.get()),
        Err(_) => text.to_string(),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
