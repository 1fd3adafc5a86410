//! Image filters and the inference model each one is dispatched to.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};

use crate::types::SearchScapeError;

/// Instruction sent with `Translate` requests.
pub const TRANSLATE_INSTRUCTION: &str = "make it look like a cartoon";

/// A named image transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    Artistic,
    Enhance,
    Translate,
}

impl Filter {
    /// Every filter, in the order they are advertised.
    pub const ALL: [Filter; 3] = [Filter::Artistic, Filter::Enhance, Filter::Translate];

    pub fn name(self) -> &'static str {
        match self {
            Filter::Artistic => "artistic",
            Filter::Enhance => "enhance",
            Filter::Translate => "translate",
        }
    }

    /// Model path on the inference provider, relative to its base URL.
    pub fn model_path(self) -> &'static str {
        match self {
            Filter::Artistic => "models/lambdalabs/sd-style-transfer",
            Filter::Enhance => "models/eugenesiow/super-image",
            Filter::Translate => "models/timbrooks/instruct-pix2pix",
        }
    }

    /// JSON request body for transforming `image_url`.
    pub fn request_body(self, image_url: &str) -> Value {
        match self {
            Filter::Artistic | Filter::Enhance => json!({ "inputs": image_url }),
            Filter::Translate => json!({
                "inputs": {
                    "image": image_url,
                    "prompt": TRANSLATE_INSTRUCTION,
                }
            }),
        }
    }

    /// Message used when the model answers without an output image.
    pub fn missing_output_message(self) -> &'static str {
        match self {
            Filter::Artistic => "Artistic transformation failed: No output image",
            Filter::Enhance => "Image enhancement failed: No output image",
            Filter::Translate => "Image translation failed: No output image",
        }
    }

    /// Human-readable list of accepted names, e.g. "artistic, enhance, or translate".
    pub fn choices() -> String {
        let names: Vec<&str> = Self::ALL.iter().map(|f| f.name()).collect();
        match names.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{}, or {last}", rest.join(", ")),
            Some((last, _)) => last.to_string(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Filter {
    type Err = SearchScapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "artistic" => Ok(Filter::Artistic),
            "enhance" => Ok(Filter::Enhance),
            "translate" => Ok(Filter::Translate),
            _ => Err(SearchScapeError::Validation(format!(
                "Invalid filter. Please choose: {}",
                Filter::choices()
            ))),
        }
    }
}
