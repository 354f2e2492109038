//! Selector-list construction.
//!
//! Every picker in the engine (projects for start/edit, spans, groupings
//! and report drill-downs for view) is built by the same rule:
//!
//! 1. a synthesized "none/default" entry ranked one score point above the
//!    highest-scoring real entry,
//! 2. source entities already filtered to the selectable ones,
//! 3. entries pre-sorted by a resolver-specific key,
//! 4. base score `count - index`, so the top of the sorted list always
//!    outranks lower entries regardless of the host's own relevance score,
//! 5. a blank remainder returns the full list; otherwise only entries
//!    whose title (plus the subtitle with any trailing "N hours"
//!    stripped) match the remaining text with score > 0 survive. The
//!    matcher is a filter, never a re-rank.

use tally_domain::display::strip_hours_suffix;

use crate::action::Action;
use crate::ports::Matcher;
use crate::session::SessionUpdate;

/// One selectable entry, already sorted into place by the resolver.
#[derive(Debug, Clone)]
pub struct SelectorEntry {
    pub title: String,
    pub subtitle: String,
    /// Query this entry rewrites to when invoked.
    pub rewrite: String,
    /// Selection persisted alongside the rewrite.
    pub update: SessionUpdate,
}

impl SelectorEntry {
    /// Entry with no subtitle.
    pub fn new(title: impl Into<String>, rewrite: String, update: SessionUpdate) -> Self {
        Self { title: title.into(), subtitle: String::new(), rewrite, update }
    }

    /// Attach a subtitle, builder-style.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }
}

/// Build the ranked action list for a selector.
///
/// `none` is the synthesized none/default entry; `entries` must already be
/// sorted by the resolver's key and filtered to selectable entities.
pub fn build(
    icon: &str,
    none: SelectorEntry,
    entries: Vec<SelectorEntry>,
    filter: &str,
    matcher: &dyn Matcher,
) -> Vec<Action> {
    let count = i32::try_from(entries.len()).unwrap_or(i32::MAX);
    let top = to_action(&none, icon, count + 1);
    build_with_top(icon, top, entries, filter, matcher)
}

/// Same rule, but with an arbitrary action as the synthesized top entry
/// (the report drill-downs use a non-actionable total line there).
pub fn build_with_top(
    icon: &str,
    top: Action,
    entries: Vec<SelectorEntry>,
    filter: &str,
    matcher: &dyn Matcher,
) -> Vec<Action> {
    let count = i32::try_from(entries.len()).unwrap_or(i32::MAX);

    let mut actions = Vec::with_capacity(entries.len() + 1);
    actions.push(top.with_score(count + 1));
    for (index, entry) in entries.iter().enumerate() {
        let index = i32::try_from(index).unwrap_or(i32::MAX);
        actions.push(to_action(entry, icon, count - index));
    }

    let filter = filter.trim();
    if filter.is_empty() {
        return actions;
    }
    actions
        .into_iter()
        .filter(|action| {
            let haystack =
                format!("{} {}", action.title, strip_hours_suffix(&action.subtitle));
            matcher.score(&haystack, filter) > 0
        })
        .collect()
}

fn to_action(entry: &SelectorEntry, icon: &str, score: i32) -> Action {
    Action::selector(
        entry.title.clone(),
        entry.subtitle.clone(),
        icon,
        score,
        entry.rewrite.clone(),
        entry.update,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::icons;

    /// Case-insensitive substring matcher, standing in for the host's.
    struct Substring;

    impl Matcher for Substring {
        fn score(&self, haystack: &str, needle: &str) -> i32 {
            i32::from(haystack.to_lowercase().contains(&needle.to_lowercase()))
        }
    }

    fn entries() -> Vec<SelectorEntry> {
        vec![
            SelectorEntry::new("Website", "start website ".to_string(), SessionUpdate::none())
                .with_subtitle("Acme · 10 hours"),
            SelectorEntry::new("Backend", "start backend ".to_string(), SessionUpdate::none())
                .with_subtitle("Acme · 2 hours"),
        ]
    }

    fn none_entry() -> SelectorEntry {
        SelectorEntry::new("No Project", "start no-project ".to_string(), SessionUpdate::none())
    }

    #[test]
    fn none_entry_outscores_every_real_entry() {
        let actions = build(icons::START, none_entry(), entries(), "", &Substring);

        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0].title, "No Project");
        let top = actions[0].score;
        assert!(actions[1..].iter().all(|a| a.score < top));
        // Exactly one point above the best real entry.
        assert_eq!(top, actions[1].score + 1);
    }

    #[test]
    fn base_scores_descend_with_sort_order() {
        let actions = build(icons::START, none_entry(), entries(), "", &Substring);
        assert_eq!(actions[1].score, 2);
        assert_eq!(actions[2].score, 1);
    }

    #[test]
    fn filter_is_applied_not_reranked() {
        let actions = build(icons::START, none_entry(), entries(), "back", &Substring);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].title, "Backend");
        // Score survives filtering unchanged.
        assert_eq!(actions[0].score, 1);
    }

    #[test]
    fn hours_suffix_does_not_leak_into_matching() {
        // "10" only appears in the stripped hours suffix.
        let actions = build(icons::START, none_entry(), entries(), "10", &Substring);
        assert!(actions.is_empty());
        // The client name in the subtitle still matches.
        let actions = build(icons::START, none_entry(), entries(), "acme", &Substring);
        assert_eq!(actions.len(), 2);
    }
}
