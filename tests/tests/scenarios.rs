use clr1_core::{
    traits::{LrTable as _, SymbolSlice as _},
    AugmentedGrammar, ErrorKind, FirstSets, Grammar, LrParser, LrTable, ParseTrace, StackCell,
    StepAction,
};
use pretty_assertions::assert_eq;

const ASSIGNMENT: &str = r#"
S -> L = R
S -> R
L -> * R
L -> id
R -> L
"#;

const ARITHMETIC: &str = r#"
// five non-terminals, two ε-productions
E -> T E'
E' -> + T E' | ε
T -> F T'
T' -> * F T' | ε
F -> ( E ) | id
"#;

const DANGLING_ELSE: &str = r#"
S -> if E then S
S -> if E then S else S
S -> other
E -> b
"#;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn table(text: &str) -> LrTable {
    clr1_core::build(text).expect("cannot build table")
}

/// Checks every reduction pops 2×|rhs| cells and pushes the rule's lhs.
fn assert_reductions(table: &LrTable, trace: &ParseTrace) {
    let rules = table.rules();

    for (prev, step) in trace.steps().iter().zip(trace.steps().iter().skip(1)) {
        let StepAction::Reduce { rule, popped, .. } = &step.action else {
            continue;
        };
        let rule = rules.borrow_rule(*rule);

        assert_eq!(*popped, 2 * rule.rhs.len());
        assert_eq!(step.stack.len(), prev.stack.len() - popped + 2);
        assert_eq!(
            step.stack[step.stack.len() - 2],
            StackCell::Symbol(rules.name(rule.lhs).to_string())
        );
        assert_eq!(step.input, prev.input);
    }
}

#[test]
fn terminal_inference() {
    let grammar = Grammar::parse(ASSIGNMENT).unwrap();

    let mut terminals: Vec<_> = grammar.iter_terminals().map(|s| s.name.clone()).collect();
    let mut non_terminals: Vec<_> = grammar.iter_non_terminals().map(|s| s.name.clone()).collect();
    terminals.sort();
    non_terminals.sort();

    assert_eq!(terminals, vec!["*", "=", "id"]);
    assert_eq!(non_terminals, vec!["L", "R", "S"]);
}

#[test]
fn accepts_assignment() {
    init();
    let table = table(ASSIGNMENT);
    let trace = LrParser::new(&table).parse("id = * id").unwrap();

    assert!(trace.is_accepted());
    assert_eq!(trace.last().unwrap().action.to_string(), "Accept");

    let s = table.rules().get_symbol_id("S").unwrap();
    let final_goto = table.goto(0, s).unwrap();
    assert_eq!(
        trace.last().unwrap().stack,
        vec![
            StackCell::State(0),
            StackCell::Symbol("S".into()),
            StackCell::State(final_goto)
        ]
    );

    assert_reductions(&table, &trace);
}

#[test]
fn rejects_adjacent_identifiers() {
    let table = table(ASSIGNMENT);
    let err = LrParser::new(&table).parse("id id").unwrap_err();

    assert!(matches!(
        err.kind(),
        ErrorKind::UnexpectedToken { token, position: 1, .. } if token == "id"
    ));

    // The partial trace ends on the shift of the first identifier.
    let trace = err.partial_trace().unwrap();
    assert_eq!(trace.len(), 2);
    assert_eq!(trace.last().unwrap().input, vec!["id", "$"]);
}

#[test]
fn deterministic_build() {
    let a = table(ASSIGNMENT);
    let b = table(ASSIGNMENT);

    assert_eq!(a, b);
    assert_eq!(a.states(), b.states());
    assert_eq!(a.to_string(), b.to_string());
}

#[test]
fn states_are_closed() {
    for text in [ASSIGNMENT, ARITHMETIC] {
        let rules = AugmentedGrammar::new(&Grammar::parse(text).unwrap());
        let first = FirstSets::new(&rules);
        let table = table(text);

        for state in table.states() {
            assert_eq!(&state.closure(&rules, &first), state);
        }
    }
}

#[test]
fn terminates_on_five_non_terminals() {
    init();
    let grammar = Grammar::parse(ARITHMETIC).unwrap();
    assert_eq!(grammar.iter_non_terminals().count(), 5);

    let table = LrTable::build(&grammar).unwrap();
    let rules = table.rules();

    // Bounded by the number of distinct items.
    let items: usize = rules
        .iter()
        .map(|rule| rule.rhs.len() + 1)
        .sum::<usize>()
        * table.terminals().len();
    assert!(table.len() <= items);

    for input in ["id", "id + id * id", "( id + id ) * id", "( ( id ) )"] {
        let trace = LrParser::new(&table).parse(input).unwrap();
        assert!(trace.is_accepted(), "{input}");
        assert_reductions(&table, &trace);
    }

    for input in ["id +", "( id", "id id", "* id"] {
        assert!(LrParser::new(&table).parse(input).is_err(), "{input}");
    }
}

#[test]
fn epsilon_reduction_pops_nothing() {
    let table = table("S -> A b\nA -> a | ε");
    let trace = LrParser::new(&table).parse("b").unwrap();

    let labels: Vec<_> = trace.iter().map(|step| step.action.to_string()).collect();
    assert_eq!(
        labels,
        vec!["", "Reduce by A -> ε", "Shift", "Reduce by S -> A b", "Accept"]
    );

    assert!(matches!(
        trace.steps()[1].action,
        StepAction::Reduce { popped: 0, .. }
    ));
    assert_reductions(&table, &trace);
}

#[test]
fn conflict_yields_no_table() {
    for text in [DANGLING_ELSE, "E -> E + E | id", "S -> A | B\nA -> x\nB -> x"] {
        let err = clr1_core::build(text).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Conflict { .. }), "{err}");
        assert!(err.partial_trace().is_none());
    }
}

#[test]
fn malformed_rule_aborts_build() {
    let err = clr1_core::build("S -> a\nS b").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MalformedRule { line: 2, .. }));
}

#[test]
fn rebuilding_discards_previous_table() {
    let first = table(ASSIGNMENT);
    let second = table("S -> a S | b");

    assert_ne!(first.len(), 0);
    assert!(LrParser::new(&second).parse("a a b").unwrap().is_accepted());
    assert!(LrParser::new(&first).parse("a a b").is_err());
}
