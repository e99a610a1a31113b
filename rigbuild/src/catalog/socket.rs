//! CPU socket inference from model names.
//!
//! Parts databases scraped from retailers often leave the socket column empty
//! for processors. The generation encoded in the model number is enough to
//! recover it for mainstream desktop parts.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INTEL_LGA1700: Regex = Regex::new(r"i\d-1[2-4]\d{3}").unwrap();
    static ref INTEL_LGA1200: Regex = Regex::new(r"i\d-1[0-1]\d{3}").unwrap();
    static ref INTEL_LGA1151: Regex = Regex::new(r"i\d-[7-9]\d{3}").unwrap();
    static ref RYZEN_AM5: Regex = Regex::new(r"\s[7-9]\d{3}x?3?d?").unwrap();
    static ref RYZEN_AM4: Regex = Regex::new(r"\s[1-5]\d{3}g?x?3?d?").unwrap();
}

/// Guess the socket of a desktop CPU from its model name.
pub fn infer_socket(model_name: &str) -> Option<&'static str> {
    let name = model_name.to_lowercase();

    if INTEL_LGA1700.is_match(&name) {
        return Some("LGA1700");
    }
    if INTEL_LGA1200.is_match(&name) {
        return Some("LGA1200");
    }
    if INTEL_LGA1151.is_match(&name) {
        return Some("LGA1151");
    }

    if name.contains("threadripper") {
        return Some("sTRX4");
    }
    if name.contains("ryzen") {
        if RYZEN_AM5.is_match(&name) {
            return Some("AM5");
        }
        if RYZEN_AM4.is_match(&name) {
            return Some("AM4");
        }
    }

    None
}
