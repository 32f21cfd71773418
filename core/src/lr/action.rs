use crate::{ItemSetId, RuleId};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Action {
    Shift(ItemSetId),
    Reduce(RuleId),
    Accept,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Shift(to) => write!(f, "s{}", to),
            Action::Reduce(rule) => write!(f, "r{}", rule),
            Action::Accept => write!(f, "acc"),
        }
    }
}
