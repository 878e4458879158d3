//! Host objects: values owned by the embedding application that scripts can
//! call methods on.

use std::collections::BTreeMap;

use crate::script::evaluator::EvalError;
use crate::script::value::Val;

/// An object bound into the evaluator under a script-visible name.
///
/// Arguments arrive already evaluated. Methods may mutate the object; the
/// host gets the final state back after the run.
pub trait HostObject {
    /// Invoke a method by name.
    fn call(&mut self, method: &str, args: &[Val]) -> Result<Val, EvalError>;

    /// Field snapshot for dumps and diagnostics.
    fn snapshot(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// A string field store, the usual context object scripts fill in.
///
/// Script-visible methods:
/// - `Set(field, value)` writes a field (any value, stored as its string form)
/// - `Get(field)` reads a field back as a string; missing fields are an error
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a field from the host side.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl HostObject for Record {
    fn call(&mut self, method: &str, args: &[Val]) -> Result<Val, EvalError> {
        match method {
            "Set" => {
                if args.len() != 2 {
                    return Err(EvalError::Host(format!(
                        "Set expects 2 arguments, got {}",
                        args.len()
                    )));
                }
                let field = args[0].as_str().ok_or_else(|| {
                    EvalError::TypeMismatch(format!(
                        "Set field name must be a string, got {}",
                        args[0].type_name()
                    ))
                })?;
                self.fields.insert(field.to_string(), args[1].to_string());
                Ok(Val::Null)
            }
            "Get" => {
                if args.len() != 1 {
                    return Err(EvalError::Host(format!(
                        "Get expects 1 argument, got {}",
                        args.len()
                    )));
                }
                let field = args[0].as_str().ok_or_else(|| {
                    EvalError::TypeMismatch(format!(
                        "Get field name must be a string, got {}",
                        args[0].type_name()
                    ))
                })?;
                match self.fields.get(field) {
                    Some(value) => Ok(Val::Str(value.clone())),
                    None => Err(EvalError::UnknownField(field.to_string())),
                }
            }
            other => Err(EvalError::UnknownMethod(format!("Record.{}", other))),
        }
    }

    fn snapshot(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
