//! Compilation unit

use serde::Serialize;

use crate::{Function, IrError};

/// A compilation unit: functions in definition order
#[derive(Debug, Clone, Default, Serialize)]
pub struct Module {
    functions: Vec<Function>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function, rejecting duplicate names
    pub fn add_function(&mut self, function: Function) -> Result<(), IrError> {
        if self.function(&function.name).is_some() {
            return Err(IrError::DuplicateFunction {
                name: function.name.clone(),
                span: function.span,
            });
        }
        self.functions.push(function);
        Ok(())
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
