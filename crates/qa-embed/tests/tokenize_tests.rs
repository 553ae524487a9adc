use std::str::FromStr;

use candle_core::Device;
use tokenizers::Tokenizer;

use qa_embed::tokenize::{prepare_tokenizer, tokenize_batch};

const CLS: u32 = 2;
const SEP: u32 = 3;

/// Word-level tokenizer that wraps every input in `[CLS] ... [SEP]`.
fn word_tokenizer() -> Tokenizer {
    let json = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": {"type": "Whitespace"},
        "post_processor": {"type": "BertProcessing", "sep": ["[SEP]", 3], "cls": ["[CLS]", 2]},
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": {"[PAD]": 0, "[UNK]": 1, "[CLS]": 2, "[SEP]": 3, "a": 4, "b": 5, "c": 6, "d": 7, "e": 8, "f": 9},
            "unk_token": "[UNK]"
        }
    }"#;
    Tokenizer::from_str(json).expect("tokenizer json")
}

#[test]
fn long_input_keeps_closing_special_token() {
    let mut tokenizer = word_tokenizer();
    let pad_id = prepare_tokenizer(&mut tokenizer, 4).expect("prepare");
    assert_eq!(pad_id, 0);

    let texts = vec!["a b c d e f".to_string()];
    let (ids, mask) = tokenize_batch(&tokenizer, &texts, pad_id, &Device::Cpu).expect("tokenize");
    let ids = ids.to_vec2::<u32>().expect("ids");
    assert_eq!(ids[0], vec![CLS, 4, 5, SEP]);
    assert_eq!(mask.to_vec2::<u32>().expect("mask")[0], vec![1, 1, 1, 1]);
}

#[test]
fn short_inputs_are_padded_to_the_longest() {
    let mut tokenizer = word_tokenizer();
    let pad_id = prepare_tokenizer(&mut tokenizer, 16).expect("prepare");

    let texts = vec!["a".to_string(), "a b c".to_string()];
    let (ids, mask) = tokenize_batch(&tokenizer, &texts, pad_id, &Device::Cpu).expect("tokenize");
    assert_eq!(ids.to_vec2::<u32>().expect("ids"), vec![vec![CLS, 4, SEP, 0, 0], vec![CLS, 4, 5, 6, SEP]]);
    assert_eq!(mask.to_vec2::<u32>().expect("mask"), vec![vec![1, 1, 1, 0, 0], vec![1, 1, 1, 1, 1]]);
}
