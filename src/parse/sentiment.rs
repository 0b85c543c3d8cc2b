use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").unwrap();
    static ref POSITIVE_WORDS: HashSet<&'static str> = [
        "happy", "great", "good", "amazing", "wonderful", "excellent", "fantastic",
        "love", "loved", "fun", "perfect", "awesome", "enjoy", "enjoyed", "enjoying",
        "glad", "thrilled", "excited", "pleased", "proud", "grateful", "thankful",
        "laugh", "laughed", "smile", "smiled", "joy", "joyful", "better", "best",
        "nice", "beautiful", "brilliant", "outstanding", "warm", "kind", "lovely",
        "delightful", "productive", "successful", "accomplished", "celebrate",
        "reconnect", "reconnected", "connected", "supportive", "uplifting",
    ]
    .into_iter()
    .collect();
    static ref NEGATIVE_WORDS: HashSet<&'static str> = [
        "sad", "bad", "awful", "terrible", "horrible", "poor",
        "hate", "hated", "angry", "frustrated", "frustration", "annoyed",
        "disappointed", "disappointing", "failed", "failure", "depressed", "anxious",
        "anxiety", "stressed", "stress", "difficult", "struggle", "struggling",
        "pain", "painful", "worst", "boring", "bored", "lonely", "hurt", "hurting",
        "upset", "worried", "trouble", "unhappy", "regret", "awkward", "uncomfortable",
        "argument", "fight", "disagreement", "missed", "distant", "cold",
    ]
    .into_iter()
    .collect();
}

/// Scores free text into a 1..=5 rating from the fixed affect lexicons.
/// Blank or keyword-free text is neutral.
pub fn compute_sentiment(text: &str) -> u8 {
    if text.trim().is_empty() {
        return 3;
    }

    let lowered = text.to_lowercase();
    let words = WORD
        .find_iter(&lowered)
        .map(|word| word.as_str())
        .collect::<Vec<_>>();
    if words.is_empty() {
        return 3;
    }

    let mut score = 0_i32;
    for word in &words {
        if POSITIVE_WORDS.contains(word) {
            score += 1;
        }
        if NEGATIVE_WORDS.contains(word) {
            score -= 1;
        }
    }

    let normalized = (score as f32 / words.len() as f32) * 10.0;
    if normalized <= -1.0 {
        1
    } else if normalized <= -0.3 {
        2
    } else if normalized <= 0.3 {
        3
    } else if normalized <= 1.0 {
        4
    } else {
        5
    }
}
