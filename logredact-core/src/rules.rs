//! rules.rs - The compiled rule model.
//!
//! A [`Rule`] is one trigger/search/replace directive whose pattern and
//! replacement template have already been validated. A [`RuleTable`] groups
//! rules by trigger while preserving declaration order, both across triggers
//! (first-seen order) and within each trigger's bucket. Iteration order is
//! application order.
//!
//! A `RuleTable` is built once by the compiler and never mutated afterwards.
//!
//! License: MIT OR APACHE 2.0

use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use memchr::memmem;
use regex::Regex;

use crate::sanitizers::template::ReplaceTemplate;

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// The cheap substring pre-filter evaluated before a rule's regex.
#[derive(Debug, Clone)]
pub enum TriggerProbe {
    /// Empty trigger: the regex is always attempted.
    Always,
    /// Case-sensitive trigger, searched with a precompiled `memmem` finder.
    Literal(memmem::Finder<'static>),
    /// Case-insensitive trigger, searched as an escaped case-folded literal regex.
    Folded(Regex),
}

impl TriggerProbe {
    /// Builds the probe for `trigger`. Only the case-insensitive form compiles
    /// a regex, and an escaped literal cannot fail to compile short of the
    /// size limit.
    pub(crate) fn new(trigger: &str, case_sensitive: bool) -> Result<Self, regex::Error> {
        if trigger.is_empty() {
            Ok(TriggerProbe::Always)
        } else if case_sensitive {
            Ok(TriggerProbe::Literal(memmem::Finder::new(trigger.as_bytes()).into_owned()))
        } else {
            regex::RegexBuilder::new(&regex::escape(trigger))
                .case_insensitive(true)
                .build()
                .map(TriggerProbe::Folded)
        }
    }

    /// Whether the trigger occurs in `haystack`.
    #[inline]
    pub fn is_present(&self, haystack: &str) -> bool {
        match self {
            TriggerProbe::Always => true,
            TriggerProbe::Literal(finder) => finder.find(haystack.as_bytes()).is_some(),
            TriggerProbe::Folded(regex) => regex.is_match(haystack),
        }
    }
}

/// One compiled redaction rule.
#[derive(Debug, Clone)]
pub struct Rule {
    description: Option<String>,
    trigger: String,
    search: Regex,
    replace: ReplaceTemplate,
    case_sensitive: bool,
    probe: TriggerProbe,
}

impl Rule {
    pub(crate) fn new(
        description: Option<String>,
        trigger: String,
        search: Regex,
        replace: ReplaceTemplate,
        case_sensitive: bool,
        probe: TriggerProbe,
    ) -> Self {
        Self {
            description,
            trigger,
            search,
            replace,
            case_sensitive,
            probe,
        }
    }

    /// Free-text documentation for the rule. Has no runtime effect.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The activation trigger. Empty means "always attempt".
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// The compiled search pattern.
    pub fn search(&self) -> &Regex {
        &self.search
    }

    /// The parsed replacement template.
    pub fn replace(&self) -> &ReplaceTemplate {
        &self.replace
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn probe(&self) -> &TriggerProbe {
        &self.probe
    }
}

/// The immutable, trigger-grouped, order-preserving collection of compiled rules.
#[derive(Debug)]
pub struct RuleTable {
    id: u64,
    buckets: IndexMap<String, Vec<Rule>>,
    rule_count: usize,
}

impl RuleTable {
    /// A table with no rules. Redacting against it is always a no-op.
    pub fn empty() -> Self {
        Self::from_rules(Vec::new())
    }

    /// Groups `rules` by trigger, keeping declaration order.
    pub(crate) fn from_rules(rules: Vec<Rule>) -> Self {
        let rule_count = rules.len();
        let mut buckets: IndexMap<String, Vec<Rule>> = IndexMap::new();
        for rule in rules {
            buckets.entry(rule.trigger.clone()).or_default().push(rule);
        }
        Self {
            id: NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed),
            buckets,
            rule_count,
        }
    }

    /// A process-unique identity for this table. Never reused.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Total number of rules across all triggers.
    pub fn len(&self) -> usize {
        self.rule_count
    }

    pub fn is_empty(&self) -> bool {
        self.rule_count == 0
    }

    /// Number of distinct triggers.
    pub fn trigger_count(&self) -> usize {
        self.buckets.len()
    }

    /// Triggers in application order.
    pub fn triggers(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// `(trigger, rules)` pairs in application order.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.buckets.iter().map(|(t, rules)| (t.as_str(), rules.as_slice()))
    }

    /// All rules, flattened in application order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.buckets.values().flatten()
    }

    /// The rules sharing `trigger`, if any.
    pub fn rules_for(&self, trigger: &str) -> Option<&[Rule]> {
        self.buckets.get(trigger).map(Vec::as_slice)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::empty()
    }
}
