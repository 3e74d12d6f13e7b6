//! Predicate-to-filter translation.
//!
//! One left-to-right walk over the predicate. Filters are routed to their
//! parent through a stack of insertion targets instead of being returned:
//! a connective allocates its node and installs it in the current target
//! before its operands are visited, then makes that node the target for both
//! operands. A negation pushes a target that wraps whatever arrives in `Not`.
//! Pending nodes live in an arena and are materialized once the walk ends.

use crate::{
    compiler::FilterCompiler,
    error::{CompileError, Result},
    field::{FieldResolution, FieldResolver, chain_path},
    hierarchy::TypeHierarchy,
    value::{range_bound, term_value},
};
use expression_engine::{Captures, EvalContext, Evaluator};
use model::{
    core::{type_handle::TypeHandle, value::Value},
    filter::Filter,
};
use predicate_syntax::{BinaryOperator, Expression, ExpressionKind, Method, UnaryOperator};
use tracing::{debug, trace};

const STRING_COMPARISON: &str = "StringComparison";

pub struct PredicateCompiler<'a> {
    resolver: &'a dyn FieldResolver,
    hierarchy: &'a dyn TypeHierarchy,
    captures: &'a Captures,
}

impl<'a> PredicateCompiler<'a> {
    pub fn new(
        resolver: &'a dyn FieldResolver,
        hierarchy: &'a dyn TypeHierarchy,
        captures: &'a Captures,
    ) -> Self {
        Self {
            resolver,
            hierarchy,
            captures,
        }
    }
}

impl FilterCompiler for PredicateCompiler<'_> {
    fn compile(&self, predicate: &Expression) -> Result<Option<Filter>> {
        let mut state = CompileState {
            fields: FieldResolution {
                resolver: self.resolver,
                hierarchy: self.hierarchy,
            },
            hierarchy: self.hierarchy,
            ctx: EvalContext::new(self.captures),
            nodes: Vec::new(),
            targets: vec![Target::Root],
            root: None,
        };

        state.visit(predicate)?;
        let filter = state.finish();

        match &filter {
            Some(filter) => debug!(predicate = %predicate, filter = %filter, "Compiled predicate"),
            None => debug!(predicate = %predicate, "Predicate produced no filter"),
        }
        Ok(filter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

/// A filter under construction.
#[derive(Debug)]
enum Slot {
    Leaf(Filter),
    Not(NodeId),
    And(Vec<NodeId>),
    Or(Vec<NodeId>),
}

/// Where the next produced filter goes.
#[derive(Debug, Clone, Copy)]
enum Target {
    /// The compile result.
    Root,
    /// Wrap in `Not`, then hand to the target beneath.
    Negate,
    /// Append to a pending `And`/`Or`.
    Append(NodeId),
}

struct CompileState<'a> {
    fields: FieldResolution<'a>,
    hierarchy: &'a dyn TypeHierarchy,
    ctx: EvalContext<'a>,
    nodes: Vec<Option<Slot>>,
    targets: Vec<Target>,
    root: Option<NodeId>,
}

impl CompileState<'_> {
    fn visit(&mut self, expr: &Expression) -> Result<()> {
        trace!(expr = %expr, depth = self.targets.len(), "Visiting");

        match &expr.kind {
            ExpressionKind::Binary {
                left,
                operator,
                right,
            } => {
                if operator.is_conjunction() || operator.is_disjunction() {
                    self.visit_connective(left, *operator, right)
                } else if operator.is_comparison() {
                    self.visit_comparison(expr, left, *operator, right)
                } else {
                    Err(unsupported(expr))
                }
            }

            ExpressionKind::Unary {
                operator: UnaryOperator::Not,
                operand,
            } => {
                self.targets.push(Target::Negate);
                self.visit(operand)?;
                self.targets.pop();
                Ok(())
            }

            ExpressionKind::Convert { operand, .. } => self.visit(operand),
            ExpressionKind::Grouped(inner) => self.visit(inner),

            ExpressionKind::Member { data_type, .. } => match expr.member_path() {
                Some(path) if data_type.is_boolean() => {
                    let field = self.fields.member_field(&path, false);
                    self.insert_leaf(Filter::term(field, true));
                    Ok(())
                }
                None if !expr.references_parameter() => {
                    debug!(expr = %expr, "Skipping closed boolean");
                    Ok(())
                }
                _ => Err(unsupported(expr)),
            },

            ExpressionKind::TypeIs {
                operand,
                type_handle,
            } => {
                self.visit_type_is(operand, type_handle);
                Ok(())
            }

            ExpressionKind::MethodCall {
                target,
                method: Method::StartsWith,
                arguments,
            } => self.visit_starts_with(target, arguments),

            ExpressionKind::Literal(_) | ExpressionKind::Variable(_) => {
                debug!(expr = %expr, "Skipping closed boolean");
                Ok(())
            }

            ExpressionKind::Unary { .. }
            | ExpressionKind::MethodCall { .. }
            | ExpressionKind::Parameter(_)
            | ExpressionKind::Conditional { .. }
            | ExpressionKind::Index { .. } => Err(unsupported(expr)),
        }
    }

    fn visit_connective(
        &mut self,
        left: &Expression,
        operator: BinaryOperator,
        right: &Expression,
    ) -> Result<()> {
        let slot = if operator.is_conjunction() {
            Slot::And(Vec::new())
        } else {
            Slot::Or(Vec::new())
        };
        let node = self.alloc(slot);
        self.insert(node);

        self.targets.push(Target::Append(node));
        self.visit(left)?;
        self.visit(right)?;
        self.targets.pop();
        Ok(())
    }

    fn visit_comparison(
        &mut self,
        expr: &Expression,
        left: &Expression,
        operator: BinaryOperator,
        right: &Expression,
    ) -> Result<()> {
        let (field, value_side, operator) = if let Some(field) = self.fields.resolve(left, false) {
            (field, right, operator)
        } else if let Some(field) = self.fields.resolve(right, false) {
            (field, left, operator.mirrored())
        } else {
            debug!(expr = %expr, "Neither operand is a field, comparison left unfiltered");
            return Ok(());
        };

        if value_side.references_parameter() {
            return Err(CompileError::UnsupportedComparison(expr.to_string()));
        }

        let value = value_side.evaluate(&self.ctx)?;

        let filter = match operator {
            BinaryOperator::Equal if value.is_null() => Filter::not(Filter::exists(field)),
            BinaryOperator::Equal => Filter::term(field, term_value(value)),
            BinaryOperator::NotEqual if value.is_null() => Filter::exists(field),
            BinaryOperator::NotEqual => Filter::not(Filter::term(field, term_value(value))),
            _ => {
                let Some(bound) = range_bound(value) else {
                    debug!(expr = %expr, "Range comparison left unfiltered");
                    return Ok(());
                };
                match operator {
                    BinaryOperator::LessThan => Filter::less_than(field, bound, false),
                    BinaryOperator::LessOrEqual => Filter::less_than(field, bound, true),
                    BinaryOperator::GreaterThan => Filter::greater_than(field, bound, false),
                    BinaryOperator::GreaterOrEqual => Filter::greater_than(field, bound, true),
                    _ => return Err(unsupported(expr)),
                }
            }
        };

        self.insert_leaf(filter);
        Ok(())
    }

    fn visit_type_is(&mut self, operand: &Expression, type_handle: &TypeHandle) {
        let Some(path) = chain_path(operand) else {
            debug!(operand = %operand, "Type test on a non-member, left unfiltered");
            return;
        };

        let field = self.fields.hierarchy_field(&path);
        let type_name = self.hierarchy.canonical_type_name(type_handle);
        self.insert_leaf(Filter::term(field, type_name));
    }

    fn visit_starts_with(&mut self, target: &Expression, arguments: &[Expression]) -> Result<()> {
        let ignore_case = match arguments {
            [_] => false,
            [_, comparison] => match comparison.evaluate(&self.ctx)? {
                Value::Enum(enum_type, member) if enum_type == STRING_COMPARISON => {
                    member.ends_with("IgnoreCase")
                }
                other => {
                    return Err(invalid_argument(format!(
                        "expected a string comparison mode, got {}",
                        other.type_name()
                    )));
                }
            },
            [_, ignore_case, _culture] => match ignore_case.evaluate(&self.ctx)? {
                Value::Boolean(flag) => flag,
                other => {
                    return Err(invalid_argument(format!(
                        "expected an ignore-case flag, got {}",
                        other.type_name()
                    )));
                }
            },
            _ => {
                return Err(invalid_argument(format!(
                    "expected 1 to 3 arguments, got {}",
                    arguments.len()
                )));
            }
        };

        let Some(field) = self.fields.resolve(target, ignore_case) else {
            debug!(target = %target, "StartsWith on a non-field, left unfiltered");
            return Ok(());
        };

        let value = arguments[0].evaluate(&self.ctx)?;
        let Some(prefix) = value.as_str() else {
            return Err(invalid_argument(format!(
                "prefix must be a string, got {}",
                value.type_name()
            )));
        };

        let prefix = if ignore_case {
            prefix.to_lowercase()
        } else {
            prefix.to_string()
        };
        self.insert_leaf(Filter::prefix(field, prefix));
        Ok(())
    }

    fn alloc(&mut self, slot: Slot) -> NodeId {
        self.nodes.push(Some(slot));
        NodeId(self.nodes.len() - 1)
    }

    fn insert_leaf(&mut self, filter: Filter) {
        trace!(filter = %filter, "Emitting filter");
        let node = self.alloc(Slot::Leaf(filter));
        self.insert(node);
    }

    /// Hands `node` to the current target, wrapping it once per negation
    /// target passed on the way down.
    fn insert(&mut self, mut node: NodeId) {
        for i in (0..self.targets.len()).rev() {
            match self.targets[i] {
                Target::Negate => node = self.alloc(Slot::Not(node)),
                Target::Append(parent) => {
                    if let Some(Some(Slot::And(children) | Slot::Or(children))) =
                        self.nodes.get_mut(parent.0)
                    {
                        children.push(node);
                    }
                    return;
                }
                Target::Root => {
                    self.root = Some(node);
                    return;
                }
            }
        }
    }

    fn finish(mut self) -> Option<Filter> {
        let root = self.root?;
        self.materialize(root)
    }

    fn materialize(&mut self, node: NodeId) -> Option<Filter> {
        match self.nodes.get_mut(node.0)?.take()? {
            Slot::Leaf(filter) => Some(filter),
            Slot::Not(inner) => self.materialize(inner).map(Filter::not),
            Slot::And(children) => Some(Filter::and(
                children
                    .into_iter()
                    .filter_map(|c| self.materialize(c))
                    .collect(),
            )),
            Slot::Or(children) => Some(Filter::or(
                children
                    .into_iter()
                    .filter_map(|c| self.materialize(c))
                    .collect(),
            )),
        }
    }
}

fn unsupported(expr: &Expression) -> CompileError {
    CompileError::UnsupportedExpression(expr.to_string())
}

fn invalid_argument(message: String) -> CompileError {
    CompileError::InvalidArgument {
        method: "StartsWith".to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::DefaultTypeHierarchy;
    use model::core::data_type::DataType;
    use predicate_syntax::{MemberPath, ast::dsl::*};
    use tracing_test::traced_test;

    struct Dotted;

    impl FieldResolver for Dotted {
        fn resolve_field_name(&self, path: &MemberPath) -> String {
            path.to_string()
        }

        fn resolve_field_name_lowercase(&self, path: &MemberPath) -> String {
            format!("{path}.lowercase")
        }
    }

    fn compile(expr: &Expression) -> Result<Option<Filter>> {
        let captures = Captures::new();
        PredicateCompiler::new(&Dotted, &DefaultTypeHierarchy, &captures).compile(expr)
    }

    fn x() -> Expression {
        param("Shop.Product")
    }

    fn id() -> Expression {
        member(x(), "Id", DataType::Int)
    }

    fn active() -> Expression {
        member(x(), "Active", DataType::Boolean)
    }

    #[test]
    fn test_negation_target_is_popped() {
        // !a && b: only `a` is negated
        let expr = and_also(not(active()), eq(id(), lit(1)));
        assert_eq!(
            compile(&expr).unwrap(),
            Some(Filter::and(vec![
                Filter::not(Filter::term("Active", true)),
                Filter::term("Id", 1),
            ]))
        );
    }

    #[test]
    fn test_double_negation() {
        let expr = not(not(active()));
        assert_eq!(
            compile(&expr).unwrap(),
            Some(Filter::not(Filter::not(Filter::term("Active", true))))
        );
    }

    #[test]
    fn test_negated_connective() {
        let expr = not(group(or_else(active(), eq(id(), lit(2)))));
        assert_eq!(
            compile(&expr).unwrap(),
            Some(Filter::not(Filter::or(vec![
                Filter::term("Active", true),
                Filter::term("Id", 2),
            ])))
        );
    }

    #[test]
    fn test_negation_of_skipped_operand_emits_nothing() {
        let expr = not(eq(lit(1), lit(1)));
        assert_eq!(compile(&expr).unwrap(), None);
    }

    #[traced_test]
    #[test]
    fn test_unfiltered_comparison_is_logged() {
        let expr = and_also(eq(add(id(), lit(1)), lit(2)), active());
        assert_eq!(
            compile(&expr).unwrap(),
            Some(Filter::and(vec![Filter::term("Active", true)]))
        );
        assert!(logs_contain("Neither operand is a field"));
    }

    #[traced_test]
    #[test]
    fn test_float_range_is_skipped() {
        let price = member(x(), "Price", DataType::Float);
        assert_eq!(compile(&lt(price, lit(9.99))).unwrap(), None);
        assert!(logs_contain("Range comparison left unfiltered"));
    }

    #[test]
    fn test_both_sides_fields_is_an_error() {
        let other = member(x(), "ParentId", DataType::Int);
        let err = compile(&eq(id(), other)).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedComparison(_)));
    }

    #[test]
    fn test_arithmetic_at_predicate_position_is_unsupported() {
        let err = compile(&add(id(), lit(1))).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedExpression(_)));

        let err = compile(&xor(active(), active())).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedExpression(_)));
    }

    #[test]
    fn test_non_boolean_member_is_unsupported() {
        let err = compile(&id()).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedExpression(_)));
    }

    #[test]
    fn test_evaluation_errors_propagate() {
        let err = compile(&eq(id(), var("missing"))).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Evaluation(expression_engine::ExpressionError::UnboundVariable(_))
        ));
    }
}
