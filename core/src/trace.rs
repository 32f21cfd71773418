use itertools::Itertools;
use prettytable::Table as PtTable;

use crate::{ItemSetId, RuleId};

/// A cell of the parse stack, which alternates states and symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackCell {
    State(ItemSetId),
    Symbol(String),
}

impl std::fmt::Display for StackCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackCell::State(id) => write!(f, "{}", id),
            StackCell::Symbol(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// The initial configuration, before the first decision.
    Start,
    Shift(ItemSetId),
    Reduce {
        rule: RuleId,
        /// The rule, as `A -> w`.
        label: String,
        /// Number of stack cells removed, twice the length of the rule.
        popped: usize,
    },
    Accept,
}

impl std::fmt::Display for StepAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepAction::Start => Ok(()),
            StepAction::Shift(_) => write!(f, "Shift"),
            StepAction::Reduce { label, .. } => write!(f, "Reduce by {}", label),
            StepAction::Accept => write!(f, "Accept"),
        }
    }
}

/// A snapshot of the parser configuration, after an action was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub stack: Vec<StackCell>,
    /// Remaining input, $ included.
    pub input: Vec<String>,
    pub action: StepAction,
}

impl Step {
    pub fn stack_string(&self) -> String {
        self.stack.iter().join(" ")
    }

    pub fn input_string(&self) -> String {
        self.input.iter().join(" ")
    }
}

/// The ordered steps of a parse run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseTrace(Vec<Step>);

impl ParseTrace {
    pub(crate) fn push(&mut self, step: Step) {
        self.0.push(step)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.0.iter()
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Step> {
        self.0.last()
    }

    pub fn is_accepted(&self) -> bool {
        self.last()
            .map(|step| step.action == StepAction::Accept)
            .unwrap_or(false)
    }
}

impl std::fmt::Display for ParseTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = PtTable::new();
        table.add_row(["Stack", "Input", "Action"].into_iter().collect());

        for step in self.iter() {
            table.add_row(
                [step.stack_string(), step.input_string(), step.action.to_string()]
                    .into_iter()
                    .collect(),
            );
        }

        write!(f, "{}", table)
    }
}
