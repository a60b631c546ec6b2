use abnf::{Case, Compiler, Construct, Rulelist};
use indexmap::{map::Entry, IndexMap, IndexSet};
use log::{debug, trace, warn};
use std::collections::HashSet;

use crate::action::Action;
use crate::config::{Config, DuplicatePolicy};
use crate::error::Error;
use crate::state::{State, StateResult};

/// Identifies a rule within a registry. Ids are handed out in declaration
/// order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub usize);

/// Rules by name, and the means to run them.
///
/// Rule references are resolved when a rule runs, not when it is declared,
/// so rules may refer to rules declared after them and to themselves.
///
/// ```
/// use parsegen::Registry;
///
/// let mut registry = Registry::new();
/// registry.declare_rule("greeting", r#""hello" [" " name]"#).unwrap();
/// registry.declare_rule("name", r#""world" / "there""#).unwrap();
///
/// let state = registry.parse("greeting", "hello there!").unwrap();
/// assert_eq!(state.position(), 11);
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    config: Config,
    rules: IndexMap<String, Action>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Registry {
            config,
            rules: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compile `body` and register it under `name`.
    pub fn declare_rule(&mut self, name: &str, body: &str) -> Result<RuleId, Error> {
        let root = Compiler::new(self.config.compile)
            .compile(body)
            .map_err(|source| Error::Compile {
                rule: name.to_owned(),
                source,
            })?;
        let action = Action::new(name, body, root);
        debug!("declare {}", action);
        self.register(action)
    }

    /// Declare every rule in an ABNF rule list, in order.
    ///
    /// Either every rule is declared or none is: all rules are compiled and
    /// checked for duplicate names before any is registered.
    pub fn declare_rulelist(&mut self, text: &str) -> Result<Vec<RuleId>, Error> {
        let list: Rulelist = text.parse().map_err(|source| Error::Compile {
            rule: String::new(),
            source,
        })?;
        let actions = list
            .rules
            .iter()
            .map(|rule| -> Result<Action, Error> {
                let root = rule
                    .compile(self.config.compile)
                    .map_err(|source| Error::Compile {
                        rule: rule.name.to_string(),
                        source,
                    })?;
                Ok(Action::new(rule.name.as_str(), rule.body.as_str(), root))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if self.config.duplicates == DuplicatePolicy::Reject {
            let mut seen = HashSet::new();
            for action in &actions {
                if self.rules.contains_key(action.name()) || !seen.insert(action.name()) {
                    return Err(Error::DuplicateRule(action.name().to_owned()));
                }
            }
        }

        actions
            .into_iter()
            .map(|action| {
                debug!("declare {}", action);
                self.register(action)
            })
            .collect()
    }

    /// Register an already compiled action under its name.
    pub fn register(&mut self, action: Action) -> Result<RuleId, Error> {
        match self.rules.entry(action.name().to_owned()) {
            Entry::Occupied(mut entry) => match self.config.duplicates {
                DuplicatePolicy::Reject => Err(Error::DuplicateRule(action.name().to_owned())),
                DuplicatePolicy::Shadow => {
                    warn!(
                        "rule '{}' redeclared, replacing '{}' with '{}'",
                        action.name(),
                        entry.get().source(),
                        action.source()
                    );
                    let id = RuleId(entry.index());
                    entry.insert(action);
                    Ok(id)
                }
            },
            Entry::Vacant(entry) => {
                let id = RuleId(entry.index());
                entry.insert(action);
                Ok(id)
            }
        }
    }

    /// Look up the action registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<&Action, Error> {
        self.rules
            .get(name)
            .ok_or_else(|| Error::UnknownRule(name.to_owned()))
    }

    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.rules.get_index_of(name).map(RuleId)
    }

    pub fn rule_name(&self, id: RuleId) -> Option<&str> {
        self.rules.get_index(id.0).map(|(name, _)| name.as_str())
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Names referenced by some rule but never declared, in the order they're
    /// first referenced.
    pub fn unresolved(&self) -> Vec<&str> {
        let mut missing = IndexSet::new();
        for action in self.rules.values() {
            for name in action.references() {
                if !self.rules.contains_key(name.as_str()) {
                    missing.insert(name.as_str());
                }
            }
        }
        missing.into_iter().collect()
    }

    /// Run the rule `name` against the input from position 0. Trailing
    /// input is allowed.
    pub fn parse<'a>(&self, name: &str, input: &'a str) -> Result<State<'a, RuleId>, Error> {
        match self.invoke(name, State::new(input)) {
            Ok(state) => Ok(state),
            Err(mut state) => Err(state.take_fault().unwrap_or_else(|| Error::ParseFailure {
                rule: name.to_owned(),
                position: state.furthest(),
            })),
        }
    }

    /// Like `parse`, requiring the rule to consume all of the input.
    pub fn parse_complete<'a>(
        &self,
        name: &str,
        input: &'a str,
    ) -> Result<State<'a, RuleId>, Error> {
        let state = self.parse(name, input)?;
        if state.is_at_end() {
            Ok(state)
        } else {
            Err(Error::TrailingInput {
                rule: name.to_owned(),
                position: state.position(),
            })
        }
    }

    /// Invoke the rule `name` on a state, recording a token for it on
    /// success.
    ///
    /// An unknown rule, or nesting past the configured depth, stops parsing:
    /// the returned state carries the error as its fault.
    pub fn invoke<'a>(
        &self,
        name: &str,
        state: State<'a, RuleId>,
    ) -> StateResult<State<'a, RuleId>> {
        let (idx, _, action) = match self.rules.get_full(name) {
            Some(found) => found,
            None => return state.fail_with(Error::UnknownRule(name.to_owned())),
        };
        if state.depth() >= self.config.max_depth {
            return state.fail_with(Error::RecursionLimit {
                rule: name.to_owned(),
                limit: self.config.max_depth,
            });
        }

        trace!("enter {} at {}", name, state.position());
        let res = state.descend(|s| s.tokenize(RuleId(idx), |s| self.evaluate(action.root(), s)));
        match &res {
            Ok(s) => trace!("matched {} up to {}", name, s.position()),
            Err(s) => trace!("failed {} at {}", name, s.position()),
        }
        res
    }

    /// Evaluate a construct against a state.
    pub fn evaluate<'a>(
        &self,
        construct: &Construct,
        state: State<'a, RuleId>,
    ) -> StateResult<State<'a, RuleId>> {
        match construct {
            Construct::Literal(term) => match term.case {
                Case::Sensitive => state.match_str(&term.value),
                Case::Insensitive => state.match_str_ignore_case(&term.value),
            },
            Construct::RuleReference(name) => self.invoke(name.as_str(), state),
            Construct::Concatenation(left, right) => state.sequence(
                |s| self.evaluate(left, s),
                |s| self.evaluate(right, s),
            ),
            Construct::Alternation(left, right) => state.choice(
                |s| self.evaluate(left, s),
                |s| self.evaluate(right, s),
            ),
            Construct::Grouping(inner) => state.apply(|s| self.evaluate(inner, s)),
            Construct::Optional(inner) => state.optional(|s| self.evaluate(inner, s)),
            Construct::Repetition(repeat, inner) => {
                state.repeat(repeat.min, repeat.max, |s| self.evaluate(inner, s))
            }
            Construct::Comment(inner, _) => self.evaluate(inner, state),
        }
    }
}
