use crate::portfolio::Persona;
use crate::runtime::Variable;

/// The binding environment of one render pass: a stack of bindings, one per
/// enclosing list iteration. Lookups go innermost first, so an inner loop
/// variable shadows an outer one only while the inner loop runs.
#[derive(Debug, Default)]
pub struct Scopes<'a> {
    frames: Vec<(String, Variable<'a>)>,
}

impl<'a> Scopes<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, value: Variable<'a>) {
        self.frames.push((name.to_string(), value));
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    pub fn get(&self, name: &str) -> Option<Variable<'a>> {
        self.frames
            .iter()
            .rev()
            .find_map(|(bound, value)| (bound == name).then_some(*value))
    }

    /// The innermost persona bound by an enclosing iteration.
    pub fn innermost_persona(&self) -> Option<(&'a Persona, bool)> {
        self.frames.iter().rev().find_map(|(_, value)| match value {
            Variable::Persona { data, selected } => Some((*data, *selected)),
            _ => None,
        })
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
