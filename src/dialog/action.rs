//! Payload tokens and free-text intents
//!
//! Every button carries an opaque payload token. `Action::parse` is the one
//! place that maps tokens to actions; keyboards build tokens with the
//! `*_payload` helpers so both directions stay in sync.

use strum::IntoStaticStr;

pub const MAIN_MENU: &str = "main_menu";
pub const SHOW_UNIVERSITIES: &str = "show_universities";
pub const SHOW_SPECIALTIES: &str = "show_specialties";
pub const SHOW_PAYMENT: &str = "show_payment";
pub const SHOW_SUPPORT: &str = "show_support";
pub const SHOW_SEARCH: &str = "show_search";
pub const SHOW_HELP: &str = "show_help";

const UNIVERSITY_PREFIX: &str = "university_";
const UNIVERSITY_SPECS_PREFIX: &str = "uni_specs_";
const SPECIALTY_PREFIX: &str = "specialty_";
const SPECIALTY_SHORT_PREFIX: &str = "spec_";
const APPLY_PREFIX: &str = "apply_";
const SEARCH_PREFIX: &str = "search_";

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    MainMenu,
    Universities,
    Specialties,
    Payment,
    Support,
    SearchHelp,
    Help,
    University(i64),
    UniversitySpecialties(i64),
    Specialty(i64),
    Apply(i64),
    Search(String),
    Unknown,
}

impl Action {
    /// Maps a payload token to an action. Unrecognized tokens and prefixes
    /// followed by a non-numeric id yield `Action::Unknown`.
    pub fn parse(token: &str) -> Self {
        match token {
            MAIN_MENU => return Action::MainMenu,
            SHOW_UNIVERSITIES => return Action::Universities,
            SHOW_SPECIALTIES => return Action::Specialties,
            SHOW_PAYMENT => return Action::Payment,
            SHOW_SUPPORT => return Action::Support,
            SHOW_SEARCH => return Action::SearchHelp,
            SHOW_HELP => return Action::Help,
            _ => {}
        }

        // `uni_specs_` must be checked before any shorter prefix it could collide with
        let by_id: [(&str, fn(i64) -> Action); 5] = [
            (UNIVERSITY_SPECS_PREFIX, Action::UniversitySpecialties),
            (UNIVERSITY_PREFIX, Action::University),
            (SPECIALTY_PREFIX, Action::Specialty),
            (SPECIALTY_SHORT_PREFIX, Action::Specialty),
            (APPLY_PREFIX, Action::Apply),
        ];
        for (prefix, make) in by_id {
            if let Some(rest) = token.strip_prefix(prefix) {
                return parse_id(rest).map_or(Action::Unknown, make);
            }
        }

        if let Some(term) = token.strip_prefix(SEARCH_PREFIX) {
            return Action::Search(term.to_string());
        }

        Action::Unknown
    }

    /// Classifies free text typed by the user.
    ///
    /// An explicit `поиск`/`search` prefix always means a search. Otherwise
    /// the lowercased text is checked for greetings, then against an ordered
    /// keyword table; the first hit wins. `None` means nothing matched.
    pub fn from_text(text: &str) -> Option<Self> {
        let lower = text.trim().to_lowercase();

        for prefix in SEARCH_WORDS {
            if let Some(term) = lower.strip_prefix(prefix) {
                return Some(Action::Search(term.trim().to_string()));
            }
        }
        if is_greeting(&lower) {
            return Some(Action::MainMenu);
        }

        KEYWORDS
            .iter()
            .find(|(words, _)| words.iter().any(|word| lower.contains(word)))
            .map(|(_, action)| action.clone())
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Matched as word stems: "здравствуйте" counts, "this" does not.
const GREETING_STEMS: &[&str] = &["привет", "здравствуй", "hello"];
/// Matched as whole words only.
const GREETING_WORDS: &[&str] = &["hi"];

const SEARCH_WORDS: &[&str] = &["поиск ", "search "];

const KEYWORDS: &[(&[&str], Action)] = &[
    (&["вуз", "университет"], Action::Universities),
    (&["специальн", "направлени"], Action::Specialties),
    (&["стоимост", "оплат", "цена"], Action::Payment),
    (&["поддержк", "помощ", "контакт"], Action::Support),
];

fn is_greeting(lower: &str) -> bool {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| GREETING_WORDS.contains(&word) || GREETING_STEMS.iter().any(|stem| word.starts_with(stem)))
}

fn parse_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

pub fn university_payload(id: i64) -> String {
    format!("{}{}", UNIVERSITY_PREFIX, id)
}

pub fn university_specialties_payload(id: i64) -> String {
    format!("{}{}", UNIVERSITY_SPECS_PREFIX, id)
}

pub fn specialty_payload(id: i64) -> String {
    format!("{}{}", SPECIALTY_PREFIX, id)
}

pub fn apply_payload(id: i64) -> String {
    format!("{}{}", APPLY_PREFIX, id)
}
