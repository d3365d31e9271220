//! Counterparty recovery from "to/from/for/at/towards" clauses.

use super::patterns::{COUNTERPARTY_CLAUSE, CURRENCY_AMOUNT, DATE_TOKEN, OWN_ACCOUNT};

/// Prepositions accepted by [`recover_counterparty`].
const ALL_PREPOSITIONS: [&str; 5] = ["to", "from", "for", "at", "towards"];

/// Prepositions accepted by [`recover_payee`].
const PAYEE_PREPOSITIONS: [&str; 3] = ["to", "from", "at"];

/// Name of the other party in a narrative alert, if one can be found.
///
/// Clauses naming the account holder's own account ("from A/c XX1234"),
/// an amount ("for Rs 450") or a date ("at 05-12-25") are skipped.
pub fn recover_counterparty(text: &str) -> Option<String> {
    recover(text, &ALL_PREPOSITIONS)
}

/// Like [`recover_counterparty`], but only "to", "from" and "at" clauses
/// count. Used on loosely structured lines where "for" and "towards"
/// usually introduce a purpose ("for groceries") rather than a party.
pub fn recover_payee(text: &str) -> Option<String> {
    recover(text, &PAYEE_PREPOSITIONS)
}

fn recover(text: &str, prepositions: &[&str]) -> Option<String> {
    let mut pos = 0;
    while let Some(caps) = COUNTERPARTY_CLAUSE.captures_at(text, pos) {
        let party_match = caps.name("party")?;
        let party = party_match.as_str().trim();
        let preposition = caps.name("prep").map_or("", |m| m.as_str());

        let rejected = party.is_empty()
            || !prepositions.iter().any(|p| p.eq_ignore_ascii_case(preposition))
            || OWN_ACCOUNT.is_match(party)
            || CURRENCY_AMOUNT.find(party).is_some_and(|m| m.start() == 0)
            || DATE_TOKEN.find(party).is_some_and(|m| m.start() == 0);
        if !rejected {
            return Some(party.to_string());
        }

        // A rejected clause may still contain the real one ("for Rs 450 at ... towards X").
        pos = party_match.start();
    }
    None
}
