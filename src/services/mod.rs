// Services

pub mod analytics;
pub mod batch;
pub mod comparison;
pub mod humanize;
pub mod remote;
pub mod similarity;
pub mod tokenizer;

/// Round to one decimal place.
pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Round to two decimal places.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Round to three decimal places.
pub(crate) fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
