//! Variable environment for the Slime interpreter.

use crate::error::{EvalError, EvalResult};
use slime_types::{Value, VarDecl, VarType};
use std::collections::BTreeMap;

/// A declared global: its type, the value it starts every pass with, and
/// the value it holds now.
#[derive(Debug, Clone, PartialEq)]
struct Variable {
    ty: VarType,
    initial: Value,
    current: Value,
}

/// Globals plus a stack of transient `foreach` loop bindings.
///
/// Lookups search loop bindings from innermost outward before the globals.
/// Loop bindings are not part of the initial snapshot:
/// [`Environment::restore_initial`] drops them.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    globals: BTreeMap<String, Variable>,
    loop_bindings: Vec<(String, Value)>,
}

impl Environment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment holding `variables` at their initial values.
    pub fn from_declarations(variables: &[VarDecl]) -> Self {
        let mut env = Self::new();
        for decl in variables {
            env.declare(&decl.name, decl.ty, decl.initial.clone());
        }
        env
    }

    /// Declare a global. Redeclaring replaces the earlier declaration.
    pub fn declare(&mut self, name: &str, ty: VarType, initial: Value) {
        self.globals.insert(
            name.to_string(),
            Variable {
                ty,
                current: initial.clone(),
                initial,
            },
        );
    }

    /// Look up a variable, innermost loop binding first.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.loop_bindings
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .or_else(|| self.globals.get(name).map(|v| &v.current))
    }

    /// Assign to a variable, keeping its declared type.
    pub fn assign(&mut self, name: &str, value: Value) -> EvalResult<()> {
        if let Some((_, slot)) = self.loop_bindings.iter_mut().rev().find(|(n, _)| n == name) {
            if value.var_type() != VarType::Object {
                return Err(EvalError::TypeMismatch(format!(
                    "loop variable '{name}' holds objects, cannot assign {}",
                    value.var_type()
                )));
            }
            *slot = value;
            return Ok(());
        }
        let var = self
            .globals
            .get_mut(name)
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))?;
        if value.var_type() != var.ty {
            return Err(EvalError::TypeMismatch(format!(
                "variable '{name}' is declared {}, cannot assign {}",
                var.ty,
                value.var_type()
            )));
        }
        var.current = value;
        Ok(())
    }

    /// Bind a `foreach` loop variable, shadowing any variable of that name.
    pub fn push_binding(&mut self, name: &str, value: Value) {
        self.loop_bindings.push((name.to_string(), value));
    }

    /// Drop the innermost loop binding.
    pub fn pop_binding(&mut self) {
        self.loop_bindings.pop();
    }

    pub fn binding_depth(&self) -> usize {
        self.loop_bindings.len()
    }

    /// Reset every global to its initial value and drop all loop bindings.
    pub fn restore_initial(&mut self) {
        for var in self.globals.values_mut() {
            var.current = var.initial.clone();
        }
        self.loop_bindings.clear();
    }

    /// Current values of all globals, by name.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.globals
            .iter()
            .map(|(name, var)| (name.clone(), var.current.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slime_types::Direction;

    fn env() -> Environment {
        Environment::from_declarations(&[
            VarDecl::with_initial("a", Value::Number(3.0)),
            VarDecl::new("o", VarType::Object),
        ])
    }

    #[test]
    fn test_assign_keeps_declared_type() {
        let mut env = env();
        env.assign("a", Value::Number(5.0)).unwrap();
        assert_eq!(env.get("a"), Some(&Value::Number(5.0)));
        let err = env.assign("a", Value::Boolean(true)).unwrap_err();
        assert!(matches!(err, EvalError::TypeMismatch(_)));
        assert_eq!(env.get("a"), Some(&Value::Number(5.0)));
    }

    #[test]
    fn test_assign_unknown_variable() {
        let mut env = env();
        assert_eq!(
            env.assign("zz", Value::Number(1.0)),
            Err(EvalError::UndefinedVariable("zz".into()))
        );
    }

    #[test]
    fn test_restore_initial_resets_values_and_drops_bindings() {
        let mut env = env();
        env.assign("a", Value::Number(9.0)).unwrap();
        env.push_binding("x", Value::tile(0, 0));
        env.restore_initial();
        assert_eq!(env.get("a"), Some(&Value::Number(3.0)));
        assert_eq!(env.get("x"), None);
        assert_eq!(env.binding_depth(), 0);
    }

    #[test]
    fn test_loop_binding_shadows_global() {
        let mut env = env();
        env.push_binding("o", Value::tile(1, 1));
        assert_eq!(env.get("o"), Some(&Value::tile(1, 1)));
        env.push_binding("o", Value::tile(2, 2));
        assert_eq!(env.get("o"), Some(&Value::tile(2, 2)));
        env.pop_binding();
        assert_eq!(env.get("o"), Some(&Value::tile(1, 1)));
        env.pop_binding();
        assert_eq!(env.get("o"), Some(&Value::null()));
    }

    #[test]
    fn test_assign_to_loop_binding_requires_object() {
        let mut env = env();
        env.push_binding("x", Value::tile(1, 1));
        env.assign("x", Value::null()).unwrap();
        assert_eq!(env.get("x"), Some(&Value::null()));
        assert!(env
            .assign("x", Value::Direction(Direction::Up))
            .is_err());
    }

    #[test]
    fn test_snapshot_lists_globals_only() {
        let mut env = env();
        env.push_binding("x", Value::tile(1, 1));
        let snap = env.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap["a"], Value::Number(3.0));
    }
}
