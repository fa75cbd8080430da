//! working_set.rs - Per-thread matcher cache.
//!
//! A `RuleTable` is shared and immutable. The mutable state needed to run it
//! lives here: one [`WorkingSet`] per (thread, table) pair, holding a private
//! clone of every rule's search regex and trigger probe plus a scratch
//! buffer. A cloned `regex::Regex` owns its own match-cache pool, so threads
//! holding separate clones never contend on it.
//!
//! Working sets are created lazily on a thread's first `redact` against a
//! table and reused for every later call. They are dropped when the thread
//! exits, and swept from a thread's store once their table is gone.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use regex::Regex;

use crate::rules::{Rule, RuleTable, TriggerProbe};

thread_local! {
    static WORKING_SETS: RefCell<HashMap<u64, WorkingSet>> = RefCell::new(HashMap::new());
}

/// The per-thread mutable mirror of one rule.
#[derive(Debug)]
struct Matcher {
    search: Regex,
    probe: TriggerProbe,
}

impl Matcher {
    fn new(rule: &Rule) -> Self {
        Self {
            search: rule.search().clone(),
            probe: rule.probe().clone(),
        }
    }

    /// Writes `haystack` with every non-overlapping match replaced into `dst`.
    /// Returns false, leaving `dst` unspecified, if nothing matched.
    fn replace_all_into(&self, rule: &Rule, haystack: &str, dst: &mut String) -> bool {
        dst.clear();
        let template = rule.replace();
        let mut last = 0;
        let mut matched = false;

        if template.has_groups() {
            for caps in self.search.captures_iter(haystack) {
                let Some(m) = caps.get(0) else { continue };
                dst.push_str(&haystack[last..m.start()]);
                template.expand_into(&caps, dst);
                last = m.end();
                matched = true;
            }
        } else {
            for m in self.search.find_iter(haystack) {
                dst.push_str(&haystack[last..m.start()]);
                template.push_literal(dst);
                last = m.end();
                matched = true;
            }
        }

        if matched {
            dst.push_str(&haystack[last..]);
        }
        matched
    }
}

/// Matchers for one table, structurally isomorphic to it.
#[derive(Debug)]
pub(crate) struct WorkingSet {
    table: Weak<RuleTable>,
    buckets: Vec<Vec<Matcher>>,
    scratch: String,
}

impl WorkingSet {
    pub(crate) fn new(table: &Arc<RuleTable>) -> Self {
        let buckets = table
            .buckets()
            .map(|(_, rules)| rules.iter().map(Matcher::new).collect())
            .collect();
        Self {
            table: Arc::downgrade(table),
            buckets,
            scratch: String::new(),
        }
    }

    fn is_live(&self) -> bool {
        self.table.strong_count() > 0
    }

    /// Threads `message` through every rule of `table` in order. `table` must
    /// be the table this set was built from.
    pub(crate) fn apply<'a>(&mut self, table: &RuleTable, message: &'a str) -> Cow<'a, str> {
        let WorkingSet { buckets, scratch, .. } = self;
        let mut current: Cow<'a, str> = Cow::Borrowed(message);

        for ((_, rules), matchers) in table.buckets().zip(buckets.iter()) {
            for (rule, matcher) in rules.iter().zip(matchers) {
                if !matcher.probe.is_present(&current) {
                    continue;
                }
                if !matcher.replace_all_into(rule, &current, scratch) {
                    continue;
                }
                // The old buffer becomes the next scratch space.
                current = match current {
                    Cow::Owned(mut buf) => {
                        std::mem::swap(&mut buf, scratch);
                        Cow::Owned(buf)
                    }
                    Cow::Borrowed(_) => Cow::Owned(std::mem::take(scratch)),
                };
            }
        }
        current
    }
}

/// Runs `f` with this thread's working set for `table`, building it on first use.
///
/// If the thread-local store is unavailable (during thread teardown) or
/// already borrowed, `f` runs against a transient working set instead.
pub(crate) fn with_working_set<R>(table: &Arc<RuleTable>, f: impl Fn(&mut WorkingSet) -> R) -> R {
    let cached = WORKING_SETS
        .try_with(|cell| {
            let mut sets = cell.try_borrow_mut().ok()?;
            if !sets.contains_key(&table.id()) {
                sets.retain(|_, set| set.is_live());
                sets.insert(table.id(), WorkingSet::new(table));
            }
            sets.get_mut(&table.id()).map(&f)
        })
        .ok()
        .flatten();

    match cached {
        Some(result) => result,
        None => f(&mut WorkingSet::new(table)),
    }
}

/// Number of working sets cached on the calling thread.
#[cfg(test)]
pub(crate) fn cached_on_this_thread() -> usize {
    WORKING_SETS.with(|cell| cell.borrow().len())
}

/// Whether the calling thread holds a working set for `table`.
#[cfg(test)]
pub(crate) fn is_cached(table: &RuleTable) -> bool {
    WORKING_SETS.with(|cell| cell.borrow().contains_key(&table.id()))
}
