pub mod dates;
pub mod sentiment;

use std::collections::HashSet;

use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use regex::Regex;

use crate::data::{InteractionType, Person};

pub use dates::{parse_date_phrase, DateMatch};
pub use sentiment::compute_sentiment;

const TITLE_MAX_CHARS: usize = 60;

// Capitalized words that look like names but aren't: sentence starters,
// temporal words, interaction verbs/nouns, prepositions.
lazy_static! {
    static ref STOPWORDS: HashSet<&'static str> = [
        "I", "The", "A", "An", "My", "We", "It", "He", "She", "They",
        "This", "That", "These", "Those", "There", "Here", "Just", "Got",
        "Had", "Was", "Were", "Been", "Have", "Has", "Did", "Does", "Do",
        "Can", "Could", "Would", "Should", "Will", "May", "Might",
        "Some", "All", "Any", "No", "Not", "But", "And", "Or", "So",
        "Very", "Really", "Also", "After", "Before", "During", "About",
        "Today", "Yesterday", "Tomorrow", "Monday", "Tuesday", "Wednesday",
        "Thursday", "Friday", "Saturday", "Sunday",
        "January", "February", "March", "April", "June",
        "July", "August", "September", "October", "November", "December",
        "Morning", "Afternoon", "Evening", "Night", "Noon",
        "Met", "Called", "Texted", "Emailed", "Messaged", "Talked",
        "Went", "Saw", "Hung", "Caught", "Grabbed", "Quick",
        "Coffee", "Lunch", "Dinner", "Breakfast", "Drinks", "Meeting",
        "Zoom", "FaceTime", "Skype", "Teams",
        "At", "In", "On", "For", "With", "From", "To", "Up",
        "Out", "Over", "Then", "When", "Where", "How", "What",
        "Who", "Why", "Now", "Still", "Already", "Again",
    ]
    .into_iter()
    .collect();
    static ref SENTENCE_SPLIT: Regex = Regex::new(r"[.!?\n]+").unwrap();
    static ref EDGE_PUNCT: Regex = Regex::new(r#"[.,!?;:'"()]"#).unwrap();
    static ref LOCATION: Regex =
        Regex::new(r"\bat\s+([A-Z][A-Za-z']+(?:\s+[A-Z][A-Za-z']+)*)").unwrap();
}

// Checked in order; the in-person group goes last because its keyword set is
// broad enough to shadow the specific channels.
const TYPE_KEYWORDS: [(&[&str], InteractionType); 6] = [
    (
        &["called", "call", "phone", "rang", "dialed", "phoned"],
        InteractionType::Call,
    ),
    (
        &[
            "texted", "text", "sms", "messaged", "message", "imessage", "whatsapp", "dm", "dmed",
        ],
        InteractionType::Text,
    ),
    (
        &["zoom", "facetime", "video", "skype", "teams", "google meet", "webex"],
        InteractionType::Video,
    ),
    (
        &["emailed", "email", "e-mail", "mailed"],
        InteractionType::Email,
    ),
    (
        &[
            "instagram", "twitter", "facebook", "snapchat", "tiktok", "linkedin", "posted",
            "commented", "liked", "tagged",
        ],
        InteractionType::SocialMedia,
    ),
    (
        &[
            "met", "saw", "coffee", "lunch", "dinner", "breakfast", "drinks", "hung out",
            "hangout", "hang out", "grabbed", "went to", "walked", "ran into", "bumped into",
            "visited", "party", "event", "concert", "movie", "gym", "workout", "hike", "trip",
            "meeting", "in person",
        ],
        InteractionType::InPerson,
    ),
];

/// A first name shared by two or more contacts; linking is deferred to the
/// user instead of guessing.
#[derive(Clone, Debug)]
pub struct AmbiguousMatch {
    pub name: String,
    pub candidates: Vec<Person>,
}

#[derive(Clone, Debug)]
pub struct ParsedLogEntry {
    pub raw_text: String,
    pub title: String,
    pub notes: String,
    pub matched_people: Vec<Person>,
    pub unmatched_names: Vec<String>,
    pub ambiguous_matches: Vec<AmbiguousMatch>,
    pub occurred_at: DateTime<Local>,
    pub date_source: Option<String>,
    pub inferred_type: Option<InteractionType>,
    pub location: Option<String>,
}

pub fn parse_log_entry(text: &str, existing_people: &[Person]) -> ParsedLogEntry {
    parse_log_entry_at(text, existing_people, Local::now())
}

/// Parses one free-text log entry against the contact list. Pure function of
/// its inputs; `reference` anchors relative date phrases.
pub fn parse_log_entry_at(
    text: &str,
    existing_people: &[Person],
    reference: DateTime<Local>,
) -> ParsedLogEntry {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParsedLogEntry {
            raw_text: text.to_owned(),
            title: String::new(),
            notes: String::new(),
            matched_people: Vec::new(),
            unmatched_names: Vec::new(),
            ambiguous_matches: Vec::new(),
            occurred_at: reference,
            date_source: None,
            inferred_type: None,
            location: None,
        };
    }

    let date_match = dates::parse_date_phrase(trimmed, reference);
    let occurred_at = date_match
        .as_ref()
        .map(|found| found.resolved)
        .unwrap_or(reference);
    let date_source = date_match.map(|found| found.text);

    let inferred_type = infer_type(trimmed);
    let matched_people = match_known_people(trimmed, existing_people);
    let unmatched = collect_unmatched_names(trimmed, &matched_people, date_source.as_deref());
    let (mut unmatched_names, ambiguous_matches) =
        split_ambiguous_first_names(unmatched, existing_people);

    let location = extract_location(trimmed, date_source.as_deref());
    if let Some(place) = &location {
        unmatched_names.retain(|name| !place.contains(name.as_str()));
    }

    ParsedLogEntry {
        raw_text: text.to_owned(),
        title: extract_title(trimmed),
        notes: trimmed.to_owned(),
        matched_people,
        unmatched_names,
        ambiguous_matches,
        occurred_at,
        date_source,
        inferred_type,
        location,
    }
}

fn infer_type(text: &str) -> Option<InteractionType> {
    let lowered = text.to_lowercase();
    for (keywords, kind) in TYPE_KEYWORDS {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return Some(kind);
        }
    }
    None
}

fn match_known_people(text: &str, existing_people: &[Person]) -> Vec<Person> {
    let mut matched = Vec::new();
    for person in existing_people {
        let variants = [Some(person.name.as_str()), person.nickname.as_deref()];
        for variant in variants.into_iter().flatten() {
            if variant.trim().is_empty() {
                continue;
            }
            // Whole word only, so "Ann" doesn't match inside "Anniversary".
            let pattern = format!(r"(?i)\b{}\b", regex::escape(variant));
            let Ok(matcher) = Regex::new(&pattern) else {
                continue;
            };
            if matcher.is_match(text) {
                matched.push(person.clone());
                break;
            }
        }
    }
    matched
}

fn strip_edge_punct(word: &str) -> String {
    EDGE_PUNCT.replace_all(word, "").into_owned()
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

fn usable_name_word(word: &str) -> bool {
    word.chars().count() >= 2 && is_capitalized(word) && !STOPWORDS.contains(word)
}

fn collect_unmatched_names(
    text: &str,
    matched_people: &[Person],
    date_source: Option<&str>,
) -> Vec<String> {
    let matched_name_strings = matched_people
        .iter()
        .flat_map(|person| {
            person
                .nickname
                .iter()
                .map(|nickname| nickname.to_lowercase())
                .chain(std::iter::once(person.name.to_lowercase()))
        })
        .collect::<HashSet<_>>();
    let date_source_lower = date_source.map(str::to_lowercase);

    let mut candidates: Vec<String> = Vec::new();
    let mut push_candidate = |candidate: String| {
        let lowered = candidate.to_lowercase();
        if matched_name_strings.contains(&lowered) {
            return;
        }
        if candidates
            .iter()
            .any(|existing| existing.to_lowercase() == lowered)
        {
            return;
        }
        candidates.push(candidate);
    };

    for sentence in SENTENCE_SPLIT.split(text) {
        let words = sentence.split_whitespace().collect::<Vec<_>>();
        let mut index = 0;
        while index < words.len() {
            let position = index;
            index += 1;

            // The first word of a sentence is usually a verb ("Met", "Had").
            if position == 0 {
                continue;
            }

            let word = strip_edge_punct(words[position]);
            if !usable_name_word(&word) {
                continue;
            }
            let word_lower = word.to_lowercase();
            if let Some(span) = &date_source_lower
                && span.contains(&word_lower)
            {
                continue;
            }
            if matched_name_strings.contains(&word_lower) {
                continue;
            }
            if matched_people
                .iter()
                .any(|person| person.name.to_lowercase().contains(&word_lower))
            {
                continue;
            }

            // A following capitalized word is probably the surname.
            let next = words.get(position + 1).map(|raw| strip_edge_punct(raw));
            match next {
                Some(next) if usable_name_word(&next) => {
                    index += 1;
                    push_candidate(format!("{word} {next}"));
                }
                _ => push_candidate(word),
            }
        }
    }

    candidates
}

fn split_ambiguous_first_names(
    candidates: Vec<String>,
    existing_people: &[Person],
) -> (Vec<String>, Vec<AmbiguousMatch>) {
    let mut unmatched = Vec::new();
    let mut ambiguous = Vec::new();

    for candidate in candidates {
        if !candidate.contains(' ') {
            let lowered = candidate.to_lowercase();
            let sharing = existing_people
                .iter()
                .filter(|person| person.first_name().to_lowercase() == lowered)
                .cloned()
                .collect::<Vec<_>>();
            if sharing.len() >= 2 {
                ambiguous.push(AmbiguousMatch {
                    name: candidate,
                    candidates: sharing,
                });
                continue;
            }
        }
        unmatched.push(candidate);
    }

    (unmatched, ambiguous)
}

fn extract_location(text: &str, date_source: Option<&str>) -> Option<String> {
    // Strip the date phrase first so "on Friday" can't read as a place.
    let cleaned = match date_source {
        Some(span) => text.replacen(span, "", 1),
        None => text.to_owned(),
    };

    LOCATION
        .captures_iter(&cleaned)
        .last()
        .and_then(|captures| captures.get(1))
        .map(|place| place.as_str().to_owned())
}

fn extract_title(text: &str) -> String {
    let first_sentence = text
        .split(['.', '!', '?', '\n'])
        .next()
        .unwrap_or("")
        .trim();
    if first_sentence.chars().count() <= TITLE_MAX_CHARS {
        first_sentence.to_owned()
    } else {
        let truncated = first_sentence
            .chars()
            .take(TITLE_MAX_CHARS - 3)
            .collect::<String>();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate, TimeZone, Weekday};

    use crate::data::RelationshipType;

    use super::*;

    // Wednesday 2026-01-07, 10:00 local.
    fn reference() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, 7, 10, 0, 0).unwrap()
    }

    fn contact(id: &str, name: &str, nickname: Option<&str>) -> Person {
        Person {
            id: id.to_owned(),
            name: name.to_owned(),
            nickname: nickname.map(str::to_owned),
            relationship_type: RelationshipType::Friend,
            closeness_level: 3,
            notes: None,
            birthday: None,
            last_interaction_at: None,
        }
    }

    fn parse(text: &str, people: &[Person]) -> ParsedLogEntry {
        parse_log_entry_at(text, people, reference())
    }

    #[test]
    fn blank_text_yields_defaults() {
        let entry = parse("   ", &[]);
        assert_eq!(entry.raw_text, "   ");
        assert!(entry.title.is_empty());
        assert!(entry.notes.is_empty());
        assert!(entry.matched_people.is_empty());
        assert!(entry.unmatched_names.is_empty());
        assert!(entry.ambiguous_matches.is_empty());
        assert_eq!(entry.occurred_at, reference());
        assert!(entry.date_source.is_none());
        assert!(entry.inferred_type.is_none());
        assert!(entry.location.is_none());
    }

    #[test]
    fn notes_keep_the_full_trimmed_text() {
        let entry = parse("  Met Alex for lunch.  ", &[]);
        assert_eq!(entry.notes, "Met Alex for lunch.");
        assert_eq!(entry.raw_text, "  Met Alex for lunch.  ");
    }

    #[test]
    fn weekday_resolves_to_the_most_recent_past_occurrence() {
        let entry = parse("Had coffee Monday", &[]);
        assert_eq!(entry.date_source.as_deref(), Some("Monday"));
        assert_eq!(entry.occurred_at.weekday(), Weekday::Mon);
        assert!(entry.occurred_at < reference());
        assert_eq!(
            entry.occurred_at.date_naive(),
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
        );
    }

    #[test]
    fn missing_date_phrase_falls_back_to_reference_time() {
        let entry = parse("Met Alex for lunch", &[]);
        assert!(entry.date_source.is_none());
        assert_eq!(entry.occurred_at, reference());
    }

    #[test]
    fn type_inference_follows_table_order() {
        assert_eq!(
            parse("Called Priya about the weekend", &[]).inferred_type,
            Some(InteractionType::Call)
        );
        assert_eq!(
            parse("Texted back and forth all day", &[]).inferred_type,
            Some(InteractionType::Text)
        );
        assert_eq!(
            parse("Zoomed with the old team", &[]).inferred_type,
            Some(InteractionType::Video)
        );
        assert_eq!(
            parse("Emailed an update", &[]).inferred_type,
            Some(InteractionType::Email)
        );
        assert_eq!(
            parse("Commented on her post", &[]).inferred_type,
            Some(InteractionType::SocialMedia)
        );
        assert_eq!(
            parse("Grabbed dinner downtown", &[]).inferred_type,
            Some(InteractionType::InPerson)
        );
        assert_eq!(parse("Thought of them fondly", &[]).inferred_type, None);
    }

    #[test]
    fn known_contact_matches_whole_words_case_insensitively() {
        let people = [contact("p1", "Sarah Chen", None)];
        let entry = parse("had coffee with sarah chen downtown", &people);
        assert_eq!(entry.matched_people.len(), 1);
        assert_eq!(entry.matched_people[0].id, "p1");
        assert!(entry.unmatched_names.is_empty());
    }

    #[test]
    fn contact_matches_at_most_once_even_with_nickname() {
        let people = [contact("p1", "Alexandra Reyes", Some("Alex"))];
        let entry = parse("Alexandra Reyes (Alex) called me back", &people);
        assert_eq!(entry.matched_people.len(), 1);
    }

    #[test]
    fn name_is_not_matched_inside_longer_words() {
        let people = [contact("p1", "Ann", None)];
        let entry = parse("Planned the Anniversary party", &people);
        assert!(entry.matched_people.is_empty());
    }

    #[test]
    fn capitalized_pairs_join_into_full_names() {
        let entry = parse("Met Sarah Chen for lunch", &[]);
        assert_eq!(entry.unmatched_names, vec!["Sarah Chen".to_owned()]);
    }

    #[test]
    fn sentence_leading_words_and_stopwords_are_skipped() {
        let entry = parse("Met them after work. Dinner was long.", &[]);
        assert!(entry.unmatched_names.is_empty());
    }

    #[test]
    fn duplicate_candidates_collapse_case_insensitively() {
        let entry = parse("Saw Priya today. Later PRIYA texted me.", &[]);
        assert_eq!(entry.unmatched_names, vec!["Priya".to_owned()]);
    }

    #[test]
    fn last_at_phrase_wins_as_location() {
        let entry = parse(
            "Was at Central Park then grabbed coffee at Joe's Diner",
            &[],
        );
        assert_eq!(entry.location.as_deref(), Some("Joe's Diner"));
    }

    #[test]
    fn location_is_extracted_from_simple_entries() {
        let entry = parse("Went to the park then grabbed coffee at Joe's Diner", &[]);
        assert_eq!(entry.location.as_deref(), Some("Joe's Diner"));
    }

    #[test]
    fn lowercase_places_are_not_locations() {
        let entry = parse("Stayed at home all evening", &[]);
        assert!(entry.location.is_none());
    }

    #[test]
    fn location_words_leave_the_unmatched_list() {
        let entry = parse("Met Priya at Blue Bottle", &[]);
        assert_eq!(entry.location.as_deref(), Some("Blue Bottle"));
        assert_eq!(entry.unmatched_names, vec!["Priya".to_owned()]);
    }

    #[test]
    fn shared_first_name_becomes_ambiguous() {
        let people = [
            contact("p1", "Sarah Chen", None),
            contact("p2", "Sarah Smith", None),
            contact("p3", "Priya Patel", None),
        ];
        let entry = parse("Coffee with Sarah", &people);
        assert!(entry.matched_people.is_empty());
        assert!(entry.unmatched_names.is_empty());
        assert_eq!(entry.ambiguous_matches.len(), 1);
        let ambiguous = &entry.ambiguous_matches[0];
        assert_eq!(ambiguous.name, "Sarah");
        assert_eq!(ambiguous.candidates.len(), 2);
    }

    #[test]
    fn single_first_name_candidate_stays_unmatched() {
        let people = [contact("p1", "Sarah Chen", None)];
        let entry = parse("Coffee with Sarah", &people);
        assert!(entry.ambiguous_matches.is_empty());
        assert_eq!(entry.unmatched_names, vec!["Sarah".to_owned()]);
    }

    #[test]
    fn title_is_the_first_sentence() {
        let entry = parse("Caught up over drinks! It went long.", &[]);
        assert_eq!(entry.title, "Caught up over drinks");
    }

    #[test]
    fn long_titles_truncate_with_ellipsis() {
        let text = "This opening sentence keeps going well past the sixty character budget for titles";
        let entry = parse(text, &[]);
        assert_eq!(entry.title.chars().count(), 60);
        assert!(entry.title.ends_with("..."));
    }

    #[test]
    fn date_words_do_not_become_names_or_places() {
        let entry = parse("Lunch with Priya last Friday", &[]);
        assert_eq!(entry.date_source.as_deref(), Some("last Friday"));
        assert_eq!(entry.unmatched_names, vec!["Priya".to_owned()]);
        assert!(entry.location.is_none());
    }

    #[test]
    fn full_pipeline_extracts_every_field() {
        let people = [contact("p1", "Sarah Chen", None)];
        let entry = parse("Had coffee with Sarah Chen yesterday at Blue Bottle", &people);
        assert_eq!(entry.matched_people.len(), 1);
        assert_eq!(entry.date_source.as_deref(), Some("yesterday"));
        assert_eq!(
            entry.occurred_at.date_naive(),
            NaiveDate::from_ymd_opt(2026, 1, 6).unwrap()
        );
        assert_eq!(entry.inferred_type, Some(InteractionType::InPerson));
        assert_eq!(entry.location.as_deref(), Some("Blue Bottle"));
        assert!(entry.unmatched_names.is_empty());
        assert_eq!(entry.title, "Had coffee with Sarah Chen yesterday at Blue Bottle");
    }
}
