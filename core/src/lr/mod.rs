use std::iter::once;

use log::trace;

use crate::{
    symbol::EOS,
    token::tokenize,
    trace::{ParseTrace, StackCell, Step, StepAction},
    traits::SymbolSlice as _,
    ClrError, ClrResult, ErrorKind, ItemSetId, SymbolId, EOS_ID,
};

use self::traits::LrTable as _;

mod action;
mod graph;
mod table;
mod transition;

pub use action::*;
use graph::*;
pub use table::{traits, LrTable};
use transition::*;

/// A shift-reduce-goto automaton driven by a [LrTable].
pub struct LrParser<'table> {
    table: &'table LrTable,
}

impl<'table> LrParser<'table> {
    pub fn new(table: &'table LrTable) -> Self {
        Self { table }
    }

    /// Parses a whitespace separated list of terminals.
    ///
    /// On a parse error, the steps taken so far are kept in the error
    /// (see [ClrError::partial_trace]).
    pub fn parse(&self, input: &str) -> ClrResult<ParseTrace> {
        let rules = self.table.rules();
        let tokens = tokenize(input)?;

        // Unknown tokens have no column, they fail on their first lookup.
        let lookaheads: Vec<Option<SymbolId>> = tokens
            .iter()
            .map(|tok| {
                rules
                    .get_symbol_id(tok.value)
                    .filter(|&sym| rules.is_terminal(sym))
            })
            .chain(once(Some(EOS_ID)))
            .collect();

        let input: Vec<String> = tokens
            .iter()
            .map(|tok| tok.value.to_string())
            .chain(once(EOS.to_string()))
            .collect();

        let mut states: Vec<ItemSetId> = vec![0];
        let mut stack: Vec<SymbolId> = Vec::default();
        let mut cursor = 0;

        let snapshot = |states: &[ItemSetId], stack: &[SymbolId], cursor: usize, action| Step {
            stack: once(StackCell::State(states[0]))
                .chain(stack.iter().zip(&states[1..]).flat_map(|(&sym, &state)| {
                    [
                        StackCell::Symbol(rules.name(sym).to_string()),
                        StackCell::State(state),
                    ]
                }))
                .collect(),
            input: input[cursor..].to_vec(),
            action,
        };

        let mut trace = ParseTrace::default();
        trace.push(snapshot(&states, &stack, cursor, StepAction::Start));

        loop {
            // Never empty: every reduction pushes its goto state back.
            let state = states.last().copied().unwrap_or_default();

            let Some(action) = lookaheads[cursor]
                .and_then(|sym| self.table.action(state, sym))
                .copied()
            else {
                // The end marker sits right after the last token.
                let position = tokens.get(cursor).map_or(tokens.len(), |tok| tok.position);

                return Err(ClrError::new(
                    ErrorKind::unexpected_token(
                        &input[cursor],
                        position,
                        self.table.iter_terminals(state).map(|sym| rules.name(sym)),
                    ),
                    Some(trace),
                ));
            };

            trace!("#{} {} :: {}", state, input[cursor], action);

            match action {
                // Push the terminal on top of the stack
                // Shift to the given state.
                Action::Shift(next) => {
                    if let Some(sym) = lookaheads[cursor] {
                        stack.push(sym);
                    }
                    states.push(next);
                    cursor += 1;

                    trace.push(snapshot(&states, &stack, cursor, StepAction::Shift(next)));
                }

                // Reduce by the given rule
                // Pops one symbol and one state per RHS symbol (none for A -> ε).
                Action::Reduce(rule_id) => {
                    let rule = rules.borrow_rule(rule_id);
                    let consume = rule.rhs.len();

                    stack.truncate(stack.len().saturating_sub(consume));
                    states.truncate(states.len().saturating_sub(consume));

                    let goto = states
                        .last()
                        .and_then(|&from| self.table.goto(from, rule.lhs));

                    let Some(goto) = goto else {
                        return Err(ClrError::new(
                            ErrorKind::MissingGoto {
                                state: states.last().copied().unwrap_or_default(),
                                symbol: rules.name(rule.lhs).to_string(),
                            },
                            Some(trace),
                        ));
                    };

                    stack.push(rule.lhs);
                    states.push(goto);

                    let action = StepAction::Reduce {
                        rule: rule_id,
                        label: rule.display(rules).to_string(),
                        popped: 2 * consume,
                    };
                    trace.push(snapshot(&states, &stack, cursor, action));
                }

                Action::Accept => {
                    trace.push(snapshot(&states, &stack, cursor, StepAction::Accept));
                    return Ok(trace);
                }
            }
        }
    }
}
