//! Default expression evaluator.
//!
//! The engine treats expressions as foreign text; this module is the in-repo
//! implementation of that foreign layer. It parses one expression per call
//! with a pest grammar, then interprets the tree against a flat variable
//! namespace and the bound host objects.
//!
//! Semantics in brief:
//! - `&&` and `||` short-circuit and require boolean operands
//! - `==` / `!=` are structural; values of different types are unequal
//! - ordering works on two numbers or two strings
//! - `+` adds numbers, or concatenates when either side is a string
//! - `-` `*` `/` `%` are numeric only; dividing by zero is an error
//! - method calls are only valid directly on a bound object name

use std::collections::HashMap;

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::script::evaluator::{EvalError, Evaluator};
use crate::script::host::HostObject;
use crate::script::value::Val;

#[derive(Parser)]
#[grammar = "script/expr.pest"]
struct ExprParser;

/* ===================== Expression Tree ===================== */

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Lit(Val),
    Var(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Method {
        object: String,
        method: String,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/* ===================== Parsing ===================== */

fn parse_expression(text: &str) -> Result<Expr, EvalError> {
    let mut pairs = ExprParser::parse(Rule::program, text)
        .map_err(|e| EvalError::Parse(e.to_string()))?;
    // Grammar guarantees program wraps exactly one expression.
    let program = pairs.next().unwrap();
    let expr = program.into_inner().next().unwrap();
    build_expression(expr)
}

fn build_expression(pair: Pair<Rule>) -> Result<Expr, EvalError> {
    match pair.as_rule() {
        Rule::expression => build_expression(pair.into_inner().next().unwrap()),
        Rule::or_expr
        | Rule::and_expr
        | Rule::equality
        | Rule::comparison
        | Rule::additive
        | Rule::multiplicative => build_binary(pair),
        Rule::unary => build_unary(pair),
        Rule::postfix => build_postfix(pair),
        Rule::primary => build_expression(pair.into_inner().next().unwrap()),
        Rule::number => {
            let text = pair.as_str();
            let value = text
                .parse::<f64>()
                .map_err(|e| EvalError::Parse(format!("invalid number {:?}: {}", text, e)))?;
            Ok(Expr::Lit(Val::Num(value)))
        }
        Rule::string => {
            let inner = pair.into_inner().next().unwrap();
            Ok(Expr::Lit(Val::Str(unescape(inner.as_str()))))
        }
        Rule::boolean => Ok(Expr::Lit(Val::Bool(pair.as_str() == "true"))),
        Rule::null_lit => Ok(Expr::Lit(Val::Null)),
        Rule::identifier => Ok(Expr::Var(pair.as_str().to_string())),
        other => Err(EvalError::Parse(format!("unexpected rule: {:?}", other))),
    }
}

/// Fold `operand (op operand)*` left to right, so every binary level is
/// left-associative.
fn build_binary(pair: Pair<Rule>) -> Result<Expr, EvalError> {
    let mut inner = pair.into_inner();
    let mut left = build_expression(inner.next().unwrap())?;

    while let Some(op_pair) = inner.next() {
        let op = match op_pair.as_rule() {
            Rule::op_or => BinOp::Or,
            Rule::op_and => BinOp::And,
            Rule::op_eq => BinOp::Eq,
            Rule::op_ne => BinOp::Ne,
            Rule::op_lt => BinOp::Lt,
            Rule::op_lte => BinOp::Lte,
            Rule::op_gt => BinOp::Gt,
            Rule::op_gte => BinOp::Gte,
            Rule::op_add => BinOp::Add,
            Rule::op_sub => BinOp::Sub,
            Rule::op_mul => BinOp::Mul,
            Rule::op_div => BinOp::Div,
            Rule::op_mod => BinOp::Mod,
            other => {
                return Err(EvalError::Parse(format!("unexpected operator: {:?}", other)));
            }
        };
        let right = build_expression(inner.next().unwrap())?;
        left = Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
    }

    Ok(left)
}

fn build_unary(pair: Pair<Rule>) -> Result<Expr, EvalError> {
    let mut inner = pair.into_inner();
    let first = inner.next().unwrap();
    let op = match first.as_rule() {
        Rule::op_not => UnaryOp::Not,
        Rule::op_neg => UnaryOp::Neg,
        _ => return build_expression(first),
    };
    let operand = build_expression(inner.next().unwrap())?;
    Ok(Expr::Unary {
        op,
        operand: Box::new(operand),
    })
}

fn build_postfix(pair: Pair<Rule>) -> Result<Expr, EvalError> {
    let mut inner = pair.into_inner();
    let primary = inner.next().unwrap();
    let Some(call) = inner.next() else {
        return build_expression(primary);
    };

    let object = match build_expression(primary)? {
        Expr::Var(name) => name,
        _ => {
            return Err(EvalError::Parse(
                "methods may only be called on a bound object name".into(),
            ));
        }
    };
    if inner.next().is_some() {
        return Err(EvalError::Parse(
            "chained method calls are not supported".into(),
        ));
    }

    let mut call_inner = call.into_inner();
    let method = call_inner.next().unwrap().as_str().to_string();
    let mut args = Vec::new();
    if let Some(list) = call_inner.next() {
        for arg in list.into_inner() {
            args.push(build_expression(arg)?);
        }
    }
    Ok(Expr::Method {
        object,
        method,
        args,
    })
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/* ===================== Evaluation ===================== */

/// Evaluator backed by an in-memory variable table and bound host objects.
///
/// Variables and objects live in separate namespaces; a bound object is not
/// a value and cannot appear outside a method call receiver.
#[derive(Default)]
pub struct ExprEvaluator {
    vars: HashMap<String, Val>,
    objects: HashMap<String, Box<dyn HostObject>>,
}

impl ExprEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variables in name order, for stable dumps.
    pub fn vars(&self) -> Vec<(&str, &Val)> {
        let mut out: Vec<_> = self.vars.iter().map(|(k, v)| (k.as_str(), v)).collect();
        out.sort_by_key(|(name, _)| *name);
        out
    }

    /// Bound objects in name order.
    pub fn objects(&self) -> Vec<(&str, &dyn HostObject)> {
        let mut out: Vec<_> = self
            .objects
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_ref()))
            .collect();
        out.sort_by_key(|(name, _)| *name);
        out
    }

    fn eval_node(&mut self, expr: &Expr) -> Result<Val, EvalError> {
        match expr {
            Expr::Lit(value) => Ok(value.clone()),
            Expr::Var(name) => match self.vars.get(name) {
                Some(value) => Ok(value.clone()),
                None if self.objects.contains_key(name) => Err(EvalError::TypeMismatch(
                    format!("{} is a bound object, not a value", name),
                )),
                None => Err(EvalError::UndefinedVariable(name.clone())),
            },
            Expr::Unary { op, operand } => {
                let value = self.eval_node(operand)?;
                match (*op, value) {
                    (UnaryOp::Not, Val::Bool(b)) => Ok(Val::Bool(!b)),
                    (UnaryOp::Neg, Val::Num(n)) => Ok(Val::Num(-n)),
                    (UnaryOp::Not, other) => Err(EvalError::TypeMismatch(format!(
                        "! needs a boolean, got {}",
                        other.type_name()
                    ))),
                    (UnaryOp::Neg, other) => Err(EvalError::TypeMismatch(format!(
                        "unary - needs a number, got {}",
                        other.type_name()
                    ))),
                }
            }
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Expr::Method {
                object,
                method,
                args,
            } => {
                let mut argv = Vec::with_capacity(args.len());
                for arg in args {
                    argv.push(self.eval_node(arg)?);
                }
                let target = self
                    .objects
                    .get_mut(object)
                    .ok_or_else(|| EvalError::UnknownObject(object.clone()))?;
                target.call(method, &argv)
            }
        }
    }

    fn eval_binary(&mut self, op: BinOp, left: &Expr, right: &Expr) -> Result<Val, EvalError> {
        // Logic operators short-circuit, so they evaluate their own operands.
        match op {
            BinOp::And => {
                return Ok(Val::Bool(
                    self.eval_bool_node(left)? && self.eval_bool_node(right)?,
                ));
            }
            BinOp::Or => {
                return Ok(Val::Bool(
                    self.eval_bool_node(left)? || self.eval_bool_node(right)?,
                ));
            }
            _ => {}
        }

        let lhs = self.eval_node(left)?;
        let rhs = self.eval_node(right)?;
        match op {
            BinOp::Eq => Ok(Val::Bool(lhs == rhs)),
            BinOp::Ne => Ok(Val::Bool(lhs != rhs)),
            BinOp::Lt | BinOp::Lte | BinOp::Gt | BinOp::Gte => compare(op, &lhs, &rhs),
            BinOp::Add => add(&lhs, &rhs),
            BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => arith(op, &lhs, &rhs),
            BinOp::And | BinOp::Or => unreachable!("logic operators are handled above"),
        }
    }

    fn eval_bool_node(&mut self, expr: &Expr) -> Result<bool, EvalError> {
        match self.eval_node(expr)? {
            Val::Bool(b) => Ok(b),
            other => Err(EvalError::TypeMismatch(format!(
                "logical operand evaluated to {}, expected a boolean",
                other.type_name()
            ))),
        }
    }
}

impl Evaluator for ExprEvaluator {
    fn bind(&mut self, name: &str, object: Box<dyn HostObject>) {
        self.objects.insert(name.to_string(), object);
    }

    fn set_var(&mut self, name: &str, value: Val) {
        self.vars.insert(name.to_string(), value);
    }

    fn get_var(&self, name: &str) -> Option<Val> {
        self.vars.get(name).cloned()
    }

    fn eval(&mut self, text: &str) -> Result<Val, EvalError> {
        let expr = parse_expression(text)?;
        self.eval_node(&expr)
    }
}

fn compare(op: BinOp, lhs: &Val, rhs: &Val) -> Result<Val, EvalError> {
    let ordering = match (lhs, rhs) {
        (Val::Num(l), Val::Num(r)) => l.partial_cmp(r),
        (Val::Str(l), Val::Str(r)) => Some(l.cmp(r)),
        _ => None,
    };
    let Some(ordering) = ordering else {
        return Err(EvalError::TypeMismatch(format!(
            "cannot order {} against {}",
            lhs.type_name(),
            rhs.type_name()
        )));
    };
    let result = match op {
        BinOp::Lt => ordering.is_lt(),
        BinOp::Lte => ordering.is_le(),
        BinOp::Gt => ordering.is_gt(),
        BinOp::Gte => ordering.is_ge(),
        _ => unreachable!("compare only sees ordering operators"),
    };
    Ok(Val::Bool(result))
}

fn add(lhs: &Val, rhs: &Val) -> Result<Val, EvalError> {
    match (lhs, rhs) {
        (Val::Num(l), Val::Num(r)) => Ok(Val::Num(l + r)),
        // String on either side concatenates.
        (Val::Str(_), _) | (_, Val::Str(_)) => Ok(Val::Str(format!("{}{}", lhs, rhs))),
        _ => Err(EvalError::TypeMismatch(format!(
            "cannot add {} and {}",
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

fn arith(op: BinOp, lhs: &Val, rhs: &Val) -> Result<Val, EvalError> {
    let (Val::Num(l), Val::Num(r)) = (lhs, rhs) else {
        return Err(EvalError::TypeMismatch(format!(
            "arithmetic needs numbers, got {} and {}",
            lhs.type_name(),
            rhs.type_name()
        )));
    };
    match op {
        BinOp::Sub => Ok(Val::Num(l - r)),
        BinOp::Mul => Ok(Val::Num(l * r)),
        BinOp::Div => {
            if *r == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Val::Num(l / r))
        }
        BinOp::Mod => {
            if *r == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Val::Num(l % r))
        }
        _ => unreachable!("arith only sees arithmetic operators"),
    }
}
