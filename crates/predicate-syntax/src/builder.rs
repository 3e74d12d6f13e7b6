use crate::{
    ast::{
        expr::{Expression, ExpressionKind},
        method::Method,
        operator::{BinaryOperator, UnaryOperator},
        span::Span,
    },
    errors::BuildError,
    parser::{PredicateParser, Rule},
};
use chrono::{DateTime, NaiveDate, Utc};
use model::{
    core::{data_type::DataType, type_handle::TypeHandle, value::Value},
    schema::SchemaRegistry,
};
use pest::{
    Parser,
    iterators::{Pair, Pairs},
};
use tracing::debug;

pub type BuildResult<T> = Result<T, BuildError>;

const STRING_COMPARISON: &[&str] = &[
    "CurrentCulture",
    "CurrentCultureIgnoreCase",
    "InvariantCulture",
    "InvariantCultureIgnoreCase",
    "Ordinal",
    "OrdinalIgnoreCase",
];

const CULTURE_INFO: &[&str] = &["CurrentCulture", "InvariantCulture"];

/// Parse predicate text (`x => ...`) into a typed expression over `root`.
///
/// Member accesses on entity-typed nodes are checked against the registry;
/// bare identifiers other than the lambda parameter must name an enum member
/// (`Color.Red`, `StringComparison.OrdinalIgnoreCase`).
pub fn parse(input: &str, registry: &SchemaRegistry, root: &str) -> BuildResult<Expression> {
    let entity = registry.entity(root).ok_or_else(|| BuildError {
        message: format!("Unknown entity type '{root}'"),
        line: 1,
        column: 1,
    })?;

    let mut pairs =
        PredicateParser::parse(Rule::predicate, input).map_err(BuildError::from_pest_error)?;
    let predicate = next_pair(&mut pairs, Span::new(0, 0, 1, 1), "predicate")?;
    let span = pair_to_span(&predicate);

    let mut inner = predicate.into_inner();
    let parameter = next_pair(&mut inner, span, "lambda parameter")?;
    let body = next_pair(&mut inner, span, "predicate body")?;

    let builder = Builder {
        registry,
        parameter: parameter.as_str(),
        entity: entity.name.clone(),
    };
    let expr = builder.build_expression(body)?;

    debug!(entity = %entity.name, predicate = %expr, "Parsed predicate");
    Ok(expr)
}

fn pair_to_span(pair: &Pair<Rule>) -> Span {
    let (line, col) = pair.line_col();
    let span_pest = pair.as_span();
    Span::new(span_pest.start(), span_pest.end(), line, col)
}

fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, span: Span, what: &str) -> BuildResult<Pair<'i, Rule>> {
    pairs
        .next()
        .ok_or_else(|| BuildError::new(format!("Expected {what}"), span))
}

struct Builder<'a> {
    registry: &'a SchemaRegistry,
    parameter: &'a str,
    entity: String,
}

impl Builder<'_> {
    fn build_expression(&self, pair: Pair<Rule>) -> BuildResult<Expression> {
        let span = pair_to_span(&pair);
        match pair.as_rule() {
            Rule::expression => {
                let inner = next_pair(&mut pair.into_inner(), span, "expression")?;
                self.build_expression(inner)
            }
            Rule::conditional => self.build_conditional(pair, span),
            Rule::coalesce
            | Rule::or_else
            | Rule::and_also
            | Rule::bit_or
            | Rule::bit_xor
            | Rule::bit_and
            | Rule::equality
            | Rule::additive
            | Rule::multiplicative => self.build_binary_chain(pair, span),
            Rule::relational => self.build_relational(pair, span),
            Rule::unary => self.build_unary(pair, span),
            Rule::postfix => self.build_postfix(pair, span),
            rule => Err(BuildError::new(
                format!("Unexpected rule in expression: {rule:?}"),
                span,
            )),
        }
    }

    fn build_conditional(&self, pair: Pair<Rule>, span: Span) -> BuildResult<Expression> {
        let mut inner = pair.into_inner();
        let test = self.build_expression(next_pair(&mut inner, span, "expression")?)?;

        match inner.next() {
            None => Ok(test),
            Some(if_true) => {
                let if_true = self.build_expression(if_true)?;
                let if_false =
                    self.build_expression(next_pair(&mut inner, span, "conditional branch")?)?;
                Ok(Expression::new(
                    ExpressionKind::Conditional {
                        test: Box::new(test),
                        if_true: Box::new(if_true),
                        if_false: Box::new(if_false),
                    },
                    span,
                ))
            }
        }
    }

    /// Folds `a op b op c` left-associatively.
    fn build_binary_chain(&self, pair: Pair<Rule>, span: Span) -> BuildResult<Expression> {
        let mut inner = pair.into_inner();
        let mut left = self.build_expression(next_pair(&mut inner, span, "operand")?)?;

        while let Some(op_pair) = inner.next() {
            let operator = binary_operator(&op_pair, span)?;
            let right = self.build_expression(next_pair(&mut inner, span, "right operand")?)?;
            left = binary(left, operator, right, span);
        }

        Ok(left)
    }

    fn build_relational(&self, pair: Pair<Rule>, span: Span) -> BuildResult<Expression> {
        let mut inner = pair.into_inner();
        let mut left = self.build_expression(next_pair(&mut inner, span, "operand")?)?;

        while let Some(next) = inner.next() {
            left = match next.as_rule() {
                Rule::type_test => {
                    let type_name = next
                        .into_inner()
                        .find(|p| p.as_rule() == Rule::type_name)
                        .ok_or_else(|| BuildError::new("Expected type name after 'is'", span))?;
                    let type_handle = self.resolve_type(&type_name)?;
                    Expression::new(
                        ExpressionKind::TypeIs {
                            operand: Box::new(left),
                            type_handle,
                        },
                        span,
                    )
                }
                _ => {
                    let operator = binary_operator(&next, span)?;
                    let right =
                        self.build_expression(next_pair(&mut inner, span, "right operand")?)?;
                    binary(left, operator, right, span)
                }
            };
        }

        Ok(left)
    }

    fn build_unary(&self, pair: Pair<Rule>, span: Span) -> BuildResult<Expression> {
        let mut parts: Vec<Pair<Rule>> = pair.into_inner().collect();
        let operand = parts
            .pop()
            .ok_or_else(|| BuildError::new("Expected operand", span))?;

        // `-42` is a literal, not a negation; this also admits i32::MIN.
        let mut expr = match (parts.last().map(|p| p.as_rule()), bare_number(&operand)) {
            (Some(Rule::op_neg), Some(number)) => {
                let literal_span = pair_to_span(&number);
                parts.pop();
                let value = parse_number(&format!("-{}", number.as_str()), literal_span)?;
                Expression::new(ExpressionKind::Literal(value), span)
            }
            _ => self.build_expression(operand)?,
        };

        for prefix in parts.into_iter().rev() {
            let kind = match prefix.as_rule() {
                Rule::op_not => ExpressionKind::Unary {
                    operator: UnaryOperator::Not,
                    operand: Box::new(expr),
                },
                Rule::op_neg => ExpressionKind::Unary {
                    operator: UnaryOperator::Negate,
                    operand: Box::new(expr),
                },
                Rule::cast => ExpressionKind::Convert {
                    operand: Box::new(expr),
                    data_type: cast_type(prefix.as_str()),
                },
                rule => {
                    return Err(BuildError::new(
                        format!("Unexpected unary prefix: {rule:?}"),
                        span,
                    ));
                }
            };
            expr = Expression::new(kind, span);
        }

        Ok(expr)
    }

    fn build_postfix(&self, pair: Pair<Rule>, span: Span) -> BuildResult<Expression> {
        let parts: Vec<Pair<Rule>> = pair.into_inner().collect();
        let (mut expr, consumed) = self.build_head(&parts, span)?;

        for op in parts.into_iter().skip(consumed) {
            let op_span = pair_to_span(&op);
            let rule = op.as_rule();
            let mut inner = op.into_inner();
            expr = match rule {
                Rule::member_access => {
                    let name = next_pair(&mut inner, op_span, "member name")?;
                    let data_type = self.member_type(&expr, name.as_str(), op_span)?;
                    Expression::new(
                        ExpressionKind::Member {
                            target: Box::new(expr),
                            member: name.as_str().to_string(),
                            data_type,
                        },
                        op_span,
                    )
                }
                Rule::method_call => {
                    let name = next_pair(&mut inner, op_span, "method name")?;
                    let arguments = inner
                        .map(|arg| self.build_expression(arg))
                        .collect::<BuildResult<Vec<_>>>()?;
                    Expression::new(
                        ExpressionKind::MethodCall {
                            target: Box::new(expr),
                            method: Method::from_name(name.as_str()),
                            arguments,
                        },
                        op_span,
                    )
                }
                Rule::indexer => {
                    let index = self.build_expression(next_pair(&mut inner, op_span, "index")?)?;
                    Expression::new(
                        ExpressionKind::Index {
                            target: Box::new(expr),
                            index: Box::new(index),
                        },
                        op_span,
                    )
                }
                rule => {
                    return Err(BuildError::new(
                        format!("Unexpected postfix operation: {rule:?}"),
                        op_span,
                    ));
                }
            };
        }

        Ok(expr)
    }

    /// Builds the leading primary of a postfix chain. Returns how many parts
    /// it consumed, since an enum literal swallows its member accesses.
    fn build_head(&self, parts: &[Pair<Rule>], span: Span) -> BuildResult<(Expression, usize)> {
        let first = parts
            .first()
            .ok_or_else(|| BuildError::new("Expected primary expression", span))?;
        let head_span = pair_to_span(first);

        if first.as_rule() != Rule::ident {
            return Ok((self.build_primary(first.clone())?, 1));
        }

        let name = first.as_str();
        if name == self.parameter {
            let kind = ExpressionKind::Parameter(DataType::Entity(self.entity.clone()));
            return Ok((Expression::new(kind, head_span), 1));
        }

        let segments: Vec<&str> = std::iter::once(name)
            .chain(
                parts[1..]
                    .iter()
                    .take_while(|p| p.as_rule() == Rule::member_access)
                    .filter_map(|p| p.clone().into_inner().next().map(|i| i.as_str())),
            )
            .collect();

        for k in 1..segments.len() {
            let enum_name = segments[..k].join(".");
            let Some((resolved, members)) = self.enum_members(&enum_name) else {
                continue;
            };
            let member = segments[k];
            if !members.iter().any(|m| m == member) {
                return Err(BuildError::new(
                    format!("'{member}' is not a member of enum '{resolved}'"),
                    head_span,
                ));
            }
            let value = Value::Enum(resolved, member.to_string());
            return Ok((
                Expression::new(ExpressionKind::Literal(value), head_span),
                k + 1,
            ));
        }

        Err(BuildError::new(
            format!("Unknown identifier '{name}'"),
            head_span,
        ))
    }

    fn build_primary(&self, pair: Pair<Rule>) -> BuildResult<Expression> {
        let span = pair_to_span(&pair);
        let kind = match pair.as_rule() {
            Rule::lit_null => ExpressionKind::Literal(Value::Null),
            Rule::lit_boolean => ExpressionKind::Literal(Value::Boolean(pair.as_str() == "true")),
            Rule::lit_number => ExpressionKind::Literal(parse_number(pair.as_str(), span)?),
            Rule::lit_string => {
                ExpressionKind::Literal(Value::String(parse_string_literal(pair.as_str())))
            }
            Rule::date_lit => {
                let text = pair
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::lit_string)
                    .ok_or_else(|| BuildError::new("Expected date string", span))?;
                let raw = parse_string_literal(text.as_str());
                ExpressionKind::Literal(Value::Timestamp(parse_timestamp(&raw, span)?))
            }
            Rule::typeof_expr => {
                let type_name = pair
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::type_name)
                    .ok_or_else(|| BuildError::new("Expected type name in typeof", span))?;
                ExpressionKind::Literal(Value::Type(self.resolve_type(&type_name)?))
            }
            Rule::variable => ExpressionKind::Variable(pair.as_str()[1..].to_string()),
            Rule::grouped => {
                let inner = next_pair(&mut pair.into_inner(), span, "expression")?;
                ExpressionKind::Grouped(Box::new(self.build_expression(inner)?))
            }
            rule => {
                return Err(BuildError::new(
                    format!("Unexpected primary expression: {rule:?}"),
                    span,
                ));
            }
        };

        Ok(Expression::new(kind, span))
    }

    fn member_type(&self, target: &Expression, member: &str, span: Span) -> BuildResult<DataType> {
        match target.data_type().underlying() {
            DataType::Entity(entity) => self
                .registry
                .field(entity, member)
                .map(|f| f.data_type.clone())
                .ok_or_else(|| {
                    BuildError::new(
                        format!("Type '{entity}' has no member '{member}'"),
                        span,
                    )
                }),
            _ => Ok(DataType::Unknown),
        }
    }

    fn resolve_type(&self, pair: &Pair<Rule>) -> BuildResult<TypeHandle> {
        let name = pair.as_str();
        self.registry
            .entity(name)
            .map(|e| e.handle())
            .ok_or_else(|| BuildError::new(format!("Unknown type '{name}'"), pair_to_span(pair)))
    }

    fn enum_members(&self, name: &str) -> Option<(String, Vec<String>)> {
        if let Some(schema) = self.registry.enum_type(name) {
            return Some((schema.name.clone(), schema.members.clone()));
        }

        let builtin = match name {
            "StringComparison" | "System.StringComparison" => STRING_COMPARISON,
            "CultureInfo" | "System.Globalization.CultureInfo" => CULTURE_INFO,
            _ => return None,
        };
        let short = name.rsplit('.').next().unwrap_or(name);
        Some((
            short.to_string(),
            builtin.iter().map(|m| m.to_string()).collect(),
        ))
    }
}

fn binary(left: Expression, operator: BinaryOperator, right: Expression, span: Span) -> Expression {
    Expression::new(
        ExpressionKind::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        },
        span,
    )
}

fn binary_operator(pair: &Pair<Rule>, span: Span) -> BuildResult<BinaryOperator> {
    let operator = match pair.as_str() {
        "??" => BinaryOperator::Coalesce,
        "||" => BinaryOperator::OrElse,
        "&&" => BinaryOperator::AndAlso,
        "|" => BinaryOperator::Or,
        "^" => BinaryOperator::ExclusiveOr,
        "&" => BinaryOperator::And,
        "==" => BinaryOperator::Equal,
        "!=" => BinaryOperator::NotEqual,
        ">" => BinaryOperator::GreaterThan,
        "<" => BinaryOperator::LessThan,
        ">=" => BinaryOperator::GreaterOrEqual,
        "<=" => BinaryOperator::LessOrEqual,
        "+" => BinaryOperator::Add,
        "-" => BinaryOperator::Subtract,
        "*" => BinaryOperator::Multiply,
        "/" => BinaryOperator::Divide,
        "%" => BinaryOperator::Modulo,
        op => {
            return Err(BuildError::new(format!("Unknown operator: {op}"), span));
        }
    };
    Ok(operator)
}

/// The number literal when a postfix chain is nothing but one.
fn bare_number<'i>(postfix: &Pair<'i, Rule>) -> Option<Pair<'i, Rule>> {
    let mut inner = postfix.clone().into_inner();
    match (inner.next(), inner.next()) {
        (Some(only), None) if only.as_rule() == Rule::lit_number => Some(only),
        _ => None,
    }
}

fn parse_number(text: &str, span: Span) -> BuildResult<Value> {
    if text.contains('.') {
        return text
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| BuildError::new(format!("Invalid number: {text}"), span));
    }
    text.parse::<i32>()
        .map(Value::Int)
        .map_err(|_| BuildError::new(format!("Integer literal {text} is out of range"), span))
}

fn parse_timestamp(raw: &str, span: Span) -> BuildResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| BuildError::new(format!("Invalid date literal '{raw}'"), span))
}

fn cast_type(cast: &str) -> DataType {
    let name = cast.trim_start_matches('(').trim_end_matches(')').trim();
    match name {
        "int" => DataType::Int,
        "float" => DataType::Float,
        "string" => DataType::String,
        "bool" => DataType::Boolean,
        "datetime" => DataType::Timestamp,
        _ => DataType::Unknown,
    }
}

fn parse_string_literal(s: &str) -> String {
    let body = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s);

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
