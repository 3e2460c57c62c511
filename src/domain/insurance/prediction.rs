use crate::domain::insurance::model_id::ModelId;
use serde::{Deserialize, Serialize};

/// Fixed USD to VND exchange rate.
pub const USD_TO_VND: f64 = 25_000.0;

/// Outcome of a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub model_id: ModelId,
    /// Model output before clamping.
    pub raw_output: f64,
    /// True when a negative model output was clamped to zero.
    pub clamped: bool,
    pub amount_usd: f64,
    pub amount_vnd: f64,
    pub display_text: String,
}

impl PredictionResult {
    pub fn from_model_output(model_id: ModelId, raw_output: f64) -> Self {
        let clamped = raw_output < 0.0;
        // also normalizes -0.0
        let amount_usd = if raw_output > 0.0 { raw_output } else { 0.0 };
        let amount_vnd = amount_usd * USD_TO_VND;
        let display_text = format!(
            "Số tiền bảo hiểm dự đoán (mô hình {}): {} VND",
            model_id.display_name(),
            format_thousands(amount_vnd)
        );

        Self {
            model_id,
            raw_output,
            clamped,
            amount_usd,
            amount_vnd,
            display_text,
        }
    }
}

/// Format with comma thousands separators and no decimals, e.g. `30,000,000`.
pub fn format_thousands(amount: f64) -> String {
    let rounded = format!("{:.0}", amount);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{}{}", sign, out)
}
