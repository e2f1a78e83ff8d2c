//! Coreference resolution
//!
//! A document-order recency heuristic, not real anaphora resolution.
//! The resolver walks the normalized triples once, remembering the last
//! PERSON and the last ORG seen in a subject, and rewrites bare pronouns
//! with whichever it remembers (PERSON first).
//!
//! Known limitation: entity names are found in subjects by substring
//! containment, so a short name such as "Li" also matches inside "Liberty".

use factgraph_core::{EntityBuckets, EntityType, Triple};

/// Subjects that never carry a usable fact
const DISCARDED_SUBJECTS: &[&str] = &["which", "however", "this"];

const SUBJECT_PRONOUNS: &[&str] = &["he", "she", "they", "it"];

const OBJECT_PRONOUNS: &[&str] = &["he", "she", "they", "it", "this", "that"];

/// An entity remembered by the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Referent {
    Person(String),
    Org(String),
}

impl Referent {
    pub fn name(&self) -> &str {
        match self {
            Self::Person(name) | Self::Org(name) => name,
        }
    }
}

/// Two-slot memory: last PERSON and last ORG seen as a subject
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Memory {
    person: Option<Referent>,
    org: Option<Referent>,
}

impl Memory {
    fn antecedent(&self) -> Option<&str> {
        self.person
            .as_ref()
            .or(self.org.as_ref())
            .map(Referent::name)
    }

    fn observe(&mut self, subject: &str, entities: &EntityBuckets) {
        if let Some(name) = longest_contained(subject, entities.get(EntityType::Person)) {
            self.person = Some(Referent::Person(name.to_string()));
        }
        if let Some(name) = longest_contained(subject, entities.get(EntityType::Org)) {
            self.org = Some(Referent::Org(name.to_string()));
        }
    }
}

/// Longest name contained in `text`; ties go to the first in sorted order
fn longest_contained<'a>(
    text: &str,
    names: impl IntoIterator<Item = &'a String>,
) -> Option<&'a str> {
    names
        .into_iter()
        .filter(|name| !name.is_empty() && text.contains(name.as_str()))
        .fold(None, |best: Option<&String>, name| match best {
            Some(current) if current.len() >= name.len() => Some(current),
            _ => Some(name),
        })
        .map(String::as_str)
}

fn is_one_of(word: &str, set: &[&str]) -> bool {
    set.iter().any(|w| word.eq_ignore_ascii_case(w))
}

/// Rewrites pronoun subjects and objects using document-order recency
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreferenceResolver;

impl CoreferenceResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve one document's triples.
    ///
    /// State lives only for the duration of this call. Output keeps the
    /// input order minus discarded triples.
    pub fn resolve(&self, triples: &[Triple], entities: &EntityBuckets) -> Vec<Triple> {
        let mut memory = Memory::default();
        let mut resolved = Vec::with_capacity(triples.len());

        for triple in triples {
            if is_one_of(&triple.subject, DISCARDED_SUBJECTS) {
                tracing::debug!(subject = %triple.subject, "Discarding triple with non-referring subject");
                continue;
            }

            let mut subject = triple.subject.clone();
            let mut object = triple.object.clone();

            if is_one_of(&subject, SUBJECT_PRONOUNS) {
                if let Some(antecedent) = memory.antecedent() {
                    tracing::debug!(pronoun = %subject, %antecedent, "Resolved subject pronoun");
                    subject = antecedent.to_string();
                }
            }

            if is_one_of(&object, OBJECT_PRONOUNS) {
                if let Some(antecedent) = memory.antecedent() {
                    tracing::debug!(pronoun = %object, %antecedent, "Resolved object pronoun");
                    object = antecedent.to_string();
                }
            }

            memory.observe(&subject, entities);

            resolved.push(Triple::new(subject, triple.verb.clone(), object));
        }

        resolved
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn obama_entities() -> EntityBuckets {
        EntityBuckets::new()
            .with(EntityType::Person, "Barack Obama")
            .with(EntityType::Person, "Michelle")
    }

    #[test]
    fn test_pronoun_subject_resolves_to_last_person() {
        let triples = vec![
            Triple::new("Barack Obama", "marry", "Michelle"),
            Triple::new("He", "meet", "Michelle"),
        ];

        let resolved = CoreferenceResolver::new().resolve(&triples, &obama_entities());

        assert_eq!(
            resolved,
            vec![
                Triple::new("Barack Obama", "marry", "Michelle"),
                Triple::new("Barack Obama", "meet", "Michelle"),
            ]
        );
    }

    #[test]
    fn test_unresolved_pronoun_passes_through() {
        let triples = vec![Triple::new("She", "visit", "Chicago")];
        let resolved = CoreferenceResolver::new().resolve(&triples, &obama_entities());
        assert_eq!(resolved, triples);
    }

    #[test]
    fn test_discarded_subjects_do_not_update_state() {
        let entities = obama_entities().with(EntityType::Org, "This Org");
        let triples = vec![
            Triple::new("this", "make", "sense"),
            Triple::new("Which", "include", "Barack Obama"),
            Triple::new("it", "pass", "the bill"),
        ];

        let resolved = CoreferenceResolver::new().resolve(&triples, &entities);

        assert_eq!(resolved, vec![Triple::new("it", "pass", "the bill")]);
    }

    #[test]
    fn test_org_used_when_no_person() {
        let entities = EntityBuckets::new().with(EntityType::Org, "Google");
        let triples = vec![
            Triple::new("Google", "acquire", "YouTube"),
            Triple::new("It", "launch", "Android"),
            Triple::new("Android", "beat", "it"),
        ];

        let resolved = CoreferenceResolver::new().resolve(&triples, &entities);

        assert_eq!(resolved[1].subject, "Google");
        assert_eq!(resolved[2].object, "Google");
    }

    #[test]
    fn test_person_preferred_over_org() {
        let entities = EntityBuckets::new()
            .with(EntityType::Person, "Sundar Pichai")
            .with(EntityType::Org, "Google");
        let triples = vec![
            Triple::new("Sundar Pichai", "lead", "Google"),
            Triple::new("Google", "release", "Gemini"),
            Triple::new("they", "praise", "that"),
        ];

        let resolved = CoreferenceResolver::new().resolve(&triples, &entities);

        assert_eq!(
            resolved[2],
            Triple::new("Sundar Pichai", "praise", "Sundar Pichai")
        );
    }

    #[test]
    fn test_substring_containment_updates_memory() {
        let entities = obama_entities();
        let triples = vec![
            Triple::new("President Barack Obama 's wife", "attend", "Princeton"),
            Triple::new("she", "study", "law"),
        ];

        let resolved = CoreferenceResolver::new().resolve(&triples, &entities);

        assert_eq!(resolved[1].subject, "Barack Obama");
    }

    #[test]
    fn test_short_names_match_inside_words() {
        let entities = EntityBuckets::new().with(EntityType::Person, "Li");
        let triples = vec![
            Triple::new("The Liberty Bell", "crack", "1846"),
            Triple::new("It", "hang", "in Philadelphia"),
        ];

        let resolved = CoreferenceResolver::new().resolve(&triples, &entities);

        // Preserved limitation: "Li" is found inside "Liberty".
        assert_eq!(resolved[1].subject, "Li");
    }

    #[test]
    fn test_longest_name_wins() {
        let entities = EntityBuckets::new()
            .with(EntityType::Person, "Obama")
            .with(EntityType::Person, "Barack Obama");
        let triples = vec![
            Triple::new("Barack Obama", "win", "the election"),
            Triple::new("he", "thank", "voters"),
        ];

        let resolved = CoreferenceResolver::new().resolve(&triples, &entities);

        assert_eq!(resolved[1].subject, "Barack Obama");
    }

    #[test]
    fn test_state_is_not_shared_between_calls() {
        let resolver = CoreferenceResolver::new();
        let entities = obama_entities();

        resolver.resolve(&[Triple::new("Barack Obama", "run", "for office")], &entities);
        let second = resolver.resolve(&[Triple::new("He", "win", "it")], &entities);

        assert_eq!(second, vec![Triple::new("He", "win", "it")]);
    }

    #[test]
    fn test_monotonic_until_next_person() {
        let entities = obama_entities().with(EntityType::Person, "Joe Biden");
        let triples = vec![
            Triple::new("Barack Obama", "choose", "Joe Biden"),
            Triple::new("He", "campaign", "in Ohio"),
            Triple::new("he", "win", "Ohio"),
            Triple::new("Joe Biden", "debate", "Paul Ryan"),
            Triple::new("He", "win", "the debate"),
        ];

        let resolved = CoreferenceResolver::new().resolve(&triples, &entities);

        assert_eq!(resolved[1].subject, "Barack Obama");
        assert_eq!(resolved[2].subject, "Barack Obama");
        assert_eq!(resolved[4].subject, "Joe Biden");
    }
}
