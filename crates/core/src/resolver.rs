//! Local intent resolver: an ordered keyword cascade over the
//! normalized utterance. First match wins, so the more specific topic
//! branches run before the bare crop-name check ("disease in my
//! sugarcane" belongs to the disease branch, not the sugarcane one).
//! Always returns a non-empty localized string.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::locale;
use crate::models::Language;

static GREETING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(hi|hello|hey|namaste|नमस्ते|हेलो|हाय)$").expect("valid greeting regex")
});

pub fn normalize_text(input: &str) -> String {
    input.trim().to_lowercase()
}

pub fn resolve(utterance: &str, lang: Language) -> &'static str {
    let query = normalize_text(utterance);

    if GREETING.is_match(&query) {
        return locale::greeting(lang);
    }

    if contains_any(
        &query,
        &[
            "recommend",
            "which crop",
            "suggest crop",
            "फसल सुझाव",
            "कौन सी फसल",
        ],
    ) {
        if contains_any(&query, &["clay", "मिट्टी"]) {
            return locale::recommend_clay(lang);
        }
        if contains_any(&query, &["sandy", "बलुई"]) {
            return locale::recommend_sandy(lang);
        }
        return locale::recommend_general(lang);
    }

    if contains_any(&query, &["disease", "pest", "रोग", "कीट"]) {
        if contains_any(&query, &["red rot", "लाल सड़न"]) {
            return locale::disease_red_rot(lang);
        }
        if contains_any(&query, &["smut", "कंडुआ"]) {
            return locale::disease_smut(lang);
        }
        return locale::disease_general(lang);
    }

    if contains_any(&query, &["water", "irrigation", "पानी", "सिंचाई"]) {
        return locale::irrigation_advice(lang);
    }

    if contains_any(&query, &["fertilizer", "nutrients", "उर्वरक", "पोषक तत्व"]) {
        return locale::fertilizer_advice(lang);
    }

    if contains_any(&query, &["yield", "production", "उपज", "उत्पादन"]) {
        return locale::yield_guidance(lang);
    }

    if contains_any(&query, &["sugarcane", "गन्ना"]) {
        return locale::sugarcane_info(lang);
    }

    if contains_any(&query, &["help", "how to", "मदद", "कैसे"]) {
        return locale::help_overview(lang);
    }

    // Broader agronomic terms, tried only after every topic branch.
    if contains_any(
        &query,
        &["plant", "sow", "seed", "germination", "grow", "पौधा", "बीज", "अंकुरण", "बढ़ना"],
    ) {
        return locale::planting_advice(lang);
    }
    if contains_any(&query, &["harvest", "cut", "mature", "कटाई", "परिपक्व"]) {
        return locale::harvest_advice(lang);
    }

    locale::default_capabilities(lang)
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
