//! Confidence-tiered answer shaping for best-available matches.
//!
//! Tiers are inclusive-low / exclusive-high:
//! `score >= high` is [`ConfidenceTier::High`], `low < score < high` is
//! [`ConfidenceTier::Medium`], anything else (including NaN) is
//! [`ConfidenceTier::Low`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_HIGH_CONFIDENCE: f32 = 0.75;
pub const DEFAULT_LOW_CONFIDENCE: f32 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidencePolicy {
    pub high: f32,
    pub low: f32,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self { high: DEFAULT_HIGH_CONFIDENCE, low: DEFAULT_LOW_CONFIDENCE }
    }
}

/// The shaped reply for one query.
///
/// `matched_question` is empty for [`ConfidenceTier::Low`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
    pub score: f32,
    pub matched_question: String,
    pub tier: ConfidenceTier,
}

impl ConfidencePolicy {
    pub fn validate(&self) -> Result<()> {
        if !self.high.is_finite() || !self.low.is_finite() {
            return Err(Error::InvalidConfig("confidence thresholds must be finite".into()));
        }
        if self.low > self.high {
            return Err(Error::InvalidConfig(format!(
                "confidence.low ({}) must not exceed confidence.high ({})",
                self.low, self.high
            )));
        }
        Ok(())
    }

    pub fn tier(&self, score: f32) -> ConfidenceTier {
        if score >= self.high {
            ConfidenceTier::High
        } else if score > self.low {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn respond(&self, best_score: f32, matched_question: &str, matched_answer: &str) -> Response {
        let tier = self.tier(best_score);
        let (text, matched_question) = match tier {
            ConfidenceTier::High => (
                format!("{matched_answer}\n\n*(Độ tin cậy: {:.1}%)*", best_score * 100.0),
                matched_question.to_string(),
            ),
            ConfidenceTier::Medium => (
                format!(
                    "Có phải ý bạn là: **\"{matched_question}\"**?\n\n**Trả lời:** {matched_answer}\n\n*(Độ tương đồng: {best_score:.2})*"
                ),
                matched_question.to_string(),
            ),
            ConfidenceTier::Low => (
                format!("Xin lỗi, tôi chưa hiểu ý bạn, vui lòng diễn đạt lại.\n\n*(Độ tương đồng tốt nhất: {best_score:.2})*"),
                String::new(),
            ),
        };
        Response { text, score: best_score, matched_question, tier }
    }
}

/// Shape a best match with the default 0.75 / 0.45 policy.
pub fn respond(best_score: f32, matched_question: &str, matched_answer: &str) -> Response {
    ConfidencePolicy::default().respond(best_score, matched_question, matched_answer)
}
