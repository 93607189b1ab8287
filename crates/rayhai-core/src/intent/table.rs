//! The ordered intent table.
//!
//! Each rule pairs an intent with a priority (lower wins) and a matcher.
//! Matchers are pure functions of the normalized text and the keyword
//! table, so every rule can be tested in isolation.

use super::model::{Classification, Intent};
use crate::keywords::{self, KeywordTable};
use regex::Regex;

/// How a rule decides whether a message belongs to its intent.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Regular expression over the normalized text.
    Pattern(Regex),
    /// Membership test against a named keyword set.
    Keywords(&'static str),
    /// Matches when any inner matcher does.
    Any(Vec<Matcher>),
}

impl Matcher {
    /// Compiles a pattern matcher.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid regular expression. Only used
    /// with the literal patterns of the built-in table.
    pub fn pattern(pattern: &str) -> Self {
        Matcher::Pattern(Regex::new(pattern).expect("valid regex"))
    }

    pub fn is_match(&self, normalized: &str, table: &KeywordTable) -> bool {
        match self {
            Matcher::Pattern(regex) => regex.is_match(normalized),
            Matcher::Keywords(set) => table.matches(set, normalized),
            Matcher::Any(matchers) => matchers.iter().any(|m| m.is_match(normalized, table)),
        }
    }
}

/// A single entry of the intent table.
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub intent: Intent,
    pub priority: u32,
    pub matcher: Matcher,
}

impl IntentRule {
    pub fn new(intent: Intent, priority: u32, matcher: Matcher) -> Self {
        Self {
            intent,
            priority,
            matcher,
        }
    }
}

/// Ordered collection of intent rules.
#[derive(Debug, Clone)]
pub struct IntentTable {
    rules: Vec<IntentRule>,
}

impl IntentTable {
    /// Builds a table from rules in declaration order.
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Returns every matching rule, in declaration order.
    pub fn matches<'a>(&'a self, normalized: &str, table: &KeywordTable) -> Vec<&'a IntentRule> {
        self.rules
            .iter()
            .filter(|rule| rule.matcher.is_match(normalized, table))
            .collect()
    }

    /// Picks the best matching rule.
    ///
    /// The lowest priority number wins. Candidates are sorted with a stable
    /// sort, so among equal priorities the first declared rule wins.
    pub fn best_match(&self, normalized: &str, table: &KeywordTable) -> Option<Classification> {
        let mut candidates = self.matches(normalized, table);
        candidates.sort_by_key(|rule| rule.priority);
        candidates
            .first()
            .map(|rule| Classification::matched(rule.intent, rule.priority))
    }
}

impl Default for IntentTable {
    fn default() -> Self {
        use Intent::*;
        use Matcher as M;

        Self::new(vec![
            IntentRule::new(
                AskIdentity,
                20,
                M::pattern(
                    r"(qui es[- ]tu|qui est[- ]ce|t'es qui|tu es qui|présente[- ]toi|presente[- ]toi|parle[- ]moi de (toi|lui|rayhan)|qui est rayhan|c'est qui)",
                ),
            ),
            IntentRule::new(
                AskAge,
                20,
                M::pattern(r"(\bâge\b|\bage\b|quel âge|combien d'ans|\bil a quel|\bné en\b)"),
            ),
            IntentRule::new(AskSkills, 20, M::Keywords(keywords::SKILL)),
            IntentRule::new(AskProjects, 20, M::Keywords(keywords::PROJECT)),
            IntentRule::new(AskExperience, 20, M::Keywords(keywords::EXPERIENCE)),
            IntentRule::new(AskGoals, 20, M::Keywords(keywords::GOAL)),
            IntentRule::new(AskContact, 20, M::Keywords(keywords::CONTACT)),
            IntentRule::new(AskSchool, 25, M::Keywords(keywords::SCHOOL)),
            IntentRule::new(
                AskLocation,
                25,
                M::pattern(r"(\bville\b|où (il |tu )?(vit|vis|habite)|\bhabite|d'où (il |tu )?vien)"),
            ),
            IntentRule::new(
                AskLanguages,
                25,
                M::pattern(r"(\blangues?\b|parles?[- ](tu|il)|\bbilingue\b)"),
            ),
            IntentRule::new(AskPassions, 25, M::Keywords(keywords::PASSION)),
            IntentRule::new(AskSkills, 30, M::Keywords(keywords::CODE)),
            IntentRule::new(
                Introduction,
                35,
                M::pattern(
                    r"(je m'appelle|on m'appelle|mon (pré)?nom (est|c'est)|moi c'est|my name is|call me)",
                ),
            ),
            IntentRule::new(
                Help,
                40,
                M::pattern(
                    r"(\baide\b|\bhelp\b|que (peux|sais)[- ]tu faire|tu sers à quoi|comment ça marche|tu fais quoi)",
                ),
            ),
            IntentRule::new(
                Encouragement,
                45,
                M::Any(vec![
                    M::Keywords(keywords::MOTIVATION),
                    M::Keywords(keywords::DIFFICULTY),
                    M::Keywords(keywords::STRESS),
                ]),
            ),
            IntentRule::new(PersonaMention, 48, M::Keywords(keywords::PERSONA_TERMS)),
            IntentRule::new(
                Farewell,
                50,
                M::pattern(
                    r"(au revoir|\bbye\b|à plus|a plus|\+\+|bonne (soirée|journée|nuit)|\bciao\b|à bientôt)",
                ),
            ),
            IntentRule::new(
                Thanks,
                55,
                M::pattern(r"(\bmerci\b|\bthanks?\b|thank you|\bthx\b|c'est gentil)"),
            ),
            IntentRule::new(
                Greeting,
                60,
                M::pattern(r"^(bonjour|salut|hello|hey|coucou|bonsoir|yo|hi|slt|wesh)\b"),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::normalize;

    fn classify(text: &str) -> Option<Intent> {
        IntentTable::default()
            .best_match(&normalize(text), &KeywordTable::default())
            .map(|c| c.intent)
    }

    #[test]
    fn test_greeting_any_case_and_whitespace() {
        for text in ["bonjour", "  Salut  ", "HELLO", "Bonsoir !", "\tcoucou\n"] {
            assert_eq!(classify(text), Some(Intent::Greeting), "input {text:?}");
        }
    }

    #[test]
    fn test_question_beats_greeting() {
        assert_eq!(
            classify("Salut, quelles sont tes compétences ?"),
            Some(Intent::AskSkills)
        );
    }

    #[test]
    fn test_thanks_beats_greeting() {
        assert_eq!(classify("salut et merci"), Some(Intent::Thanks));
    }

    #[test]
    fn test_equal_priority_prefers_first_declared() {
        // age and skills share priority 20; age is declared first
        assert_eq!(
            classify("quel âge et quelles compétences"),
            Some(Intent::AskAge)
        );
    }

    #[test]
    fn test_priority_independent_of_declaration_order() {
        let table = IntentTable::new(vec![
            IntentRule::new(Intent::Greeting, 60, Matcher::pattern(r"^salut")),
            IntentRule::new(Intent::Thanks, 10, Matcher::pattern(r"merci")),
        ]);
        let best = table
            .best_match("salut merci", &KeywordTable::default())
            .unwrap();
        assert_eq!(best.intent, Intent::Thanks);
        assert_eq!(best.priority, Some(10));

        let reversed = IntentTable::new(table.rules().iter().rev().cloned().collect());
        let best = reversed
            .best_match("salut merci", &KeywordTable::default())
            .unwrap();
        assert_eq!(best.intent, Intent::Thanks);
    }

    #[test]
    fn test_tie_broken_by_declaration_order() {
        let table = IntentTable::new(vec![
            IntentRule::new(Intent::AskGoals, 5, Matcher::pattern(r"x")),
            IntentRule::new(Intent::AskProjects, 5, Matcher::pattern(r"x")),
            IntentRule::new(Intent::AskSkills, 5, Matcher::pattern(r"x")),
        ]);
        for _ in 0..10 {
            assert_eq!(
                table.best_match("x", &KeywordTable::default()).unwrap().intent,
                Intent::AskGoals
            );
        }
    }

    #[test]
    fn test_code_keywords_fall_back_to_skills() {
        assert_eq!(classify("tu sais coder ?"), Some(Intent::AskSkills));
    }

    #[test]
    fn test_common_questions() {
        assert_eq!(classify("qui es-tu"), Some(Intent::AskIdentity));
        assert_eq!(classify("Il a quel âge ?"), Some(Intent::AskAge));
        assert_eq!(classify("montre moi ses projets"), Some(Intent::AskProjects));
        assert_eq!(classify("comment le contacter"), Some(Intent::AskContact));
        assert_eq!(classify("il parle quelles langues"), Some(Intent::AskLanguages));
        assert_eq!(classify("il habite où ?"), Some(Intent::AskLocation));
        assert_eq!(classify("au revoir"), Some(Intent::Farewell));
        assert_eq!(classify("je m'appelle Léa"), Some(Intent::Introduction));
    }

    #[test]
    fn test_persona_terms_rule_uses_derived_set() {
        let mut terms = KeywordTable::default();
        terms.extend(keywords::PERSONA_TERMS, ["valorant"]);
        let best = IntentTable::default()
            .best_match("tu joues à valorant ?", &terms)
            .map(|c| c.intent);
        assert_eq!(best, Some(Intent::PersonaMention));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(classify("la météo de demain"), None);
    }
}
