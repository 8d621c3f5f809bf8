//! JSON wire codec for the tagged tree.
//!
//! A template is a JSON array of statements. A statement is either a bare
//! string (template text) or a node: an array whose first element is the
//! integer opcode and whose remaining elements are the operands fixed per
//! opcode. [`decode_template`] and [`encode_template`] convert between that
//! form and the typed tree; [`JsonAstParser`] adapts the decoder to the
//! [`TemplateParser`] contract.

use serde_json::{json, Value as Json};

use crate::node::{
    BinaryOp, CallExpr, CallName, ForLoop, IfBranch, MacroDecl, MapEntry, MapKey, Node,
    PathSegment, SelectorBase, UnaryOp,
};
use crate::{Opcode, ParseError, TemplateParser};

/// Failure while decoding the wire form into a typed tree.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("template root must be an array of statements")]
    RootNotArray,
    #[error("expected a tagged node array, found {found}")]
    ExpectedNode { found: &'static str },
    #[error("node array is missing its integer opcode")]
    MissingOpcode,
    #[error("unknown opcode {code}")]
    UnknownOpcode { code: i64 },
    #[error("malformed {opcode} node: {detail}")]
    Malformed {
        opcode: &'static str,
        detail: String,
    },
}

fn malformed(opcode: Opcode, detail: impl Into<String>) -> DecodeError {
    DecodeError::Malformed {
        opcode: opcode.name(),
        detail: detail.into(),
    }
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

// Decoding

/// Decode a whole template: a JSON array of statements.
pub fn decode_template(root: &Json) -> Result<Vec<Node>, DecodeError> {
    let items = root.as_array().ok_or(DecodeError::RootNotArray)?;
    decode_statements(items)
}

fn decode_statements(items: &[Json]) -> Result<Vec<Node>, DecodeError> {
    items.iter().map(decode_statement).collect()
}

fn decode_statement_list(value: &Json, opcode: Opcode) -> Result<Vec<Node>, DecodeError> {
    let items = value
        .as_array()
        .ok_or_else(|| malformed(opcode, format!("expected statement list, found {}", json_kind(value))))?;
    decode_statements(items)
}

/// Bare strings are text in statement position; everything else is a node.
fn decode_statement(value: &Json) -> Result<Node, DecodeError> {
    match value {
        Json::String(text) => Ok(Node::Text(text.clone())),
        other => decode_node(other),
    }
}

/// Decode one tagged node array.
pub fn decode_node(value: &Json) -> Result<Node, DecodeError> {
    let parts = value.as_array().ok_or(DecodeError::ExpectedNode {
        found: json_kind(value),
    })?;
    let code = parts
        .first()
        .and_then(Json::as_i64)
        .ok_or(DecodeError::MissingOpcode)?;
    let opcode = Opcode::from_code(code).ok_or(DecodeError::UnknownOpcode { code })?;
    let args = &parts[1..];

    match opcode {
        Opcode::True => expect_arity(opcode, args, 0).map(|()| Node::True),
        Opcode::False => expect_arity(opcode, args, 0).map(|()| Node::False),
        Opcode::Null => expect_arity(opcode, args, 0).map(|()| Node::Null),

        Opcode::Int => {
            expect_arity(opcode, args, 1)?;
            let n = args[0]
                .as_i64()
                .ok_or_else(|| malformed(opcode, "operand must be an integer"))?;
            Ok(Node::Int(n))
        }
        Opcode::Double => {
            expect_arity(opcode, args, 1)?;
            let n = args[0]
                .as_f64()
                .ok_or_else(|| malformed(opcode, "operand must be a number"))?;
            Ok(Node::Double(n))
        }
        Opcode::String => {
            expect_arity(opcode, args, 1)?;
            let s = args[0]
                .as_str()
                .ok_or_else(|| malformed(opcode, "operand must be a string"))?;
            Ok(Node::Str(s.to_string()))
        }

        Opcode::Map => {
            expect_arity(opcode, args, 1)?;
            decode_map(&args[0])
        }

        Opcode::Add => decode_binary(opcode, args, BinaryOp::Add),
        Opcode::Sub => decode_binary(opcode, args, BinaryOp::Sub),
        Opcode::Mul => decode_binary(opcode, args, BinaryOp::Mul),
        Opcode::Div => decode_binary(opcode, args, BinaryOp::Div),
        Opcode::Mod => decode_binary(opcode, args, BinaryOp::Mod),
        Opcode::Or => decode_binary(opcode, args, BinaryOp::Or),
        Opcode::And => decode_binary(opcode, args, BinaryOp::And),
        Opcode::Equal => decode_binary(opcode, args, BinaryOp::Equal),
        Opcode::NotEqual => decode_binary(opcode, args, BinaryOp::NotEqual),
        Opcode::LessThan => decode_binary(opcode, args, BinaryOp::LessThan),
        Opcode::LessOrEqual => decode_binary(opcode, args, BinaryOp::LessOrEqual),
        Opcode::GreaterThan => decode_binary(opcode, args, BinaryOp::GreaterThan),
        Opcode::GreaterOrEqual => decode_binary(opcode, args, BinaryOp::GreaterOrEqual),

        Opcode::Negate => decode_unary(opcode, args, UnaryOp::Negate),
        Opcode::Not => decode_unary(opcode, args, UnaryOp::Not),

        Opcode::Ternary => {
            if args.len() != 2 && args.len() != 3 {
                return Err(malformed(opcode, "expected condition, then, optional else"));
            }
            let else_branch = match args.get(2) {
                Some(node) => Some(Box::new(decode_node(node)?)),
                None => None,
            };
            Ok(Node::Ternary {
                condition: Box::new(decode_node(&args[0])?),
                then_branch: Box::new(decode_node(&args[1])?),
                else_branch,
            })
        }

        Opcode::If => {
            expect_arity(opcode, args, 1)?;
            decode_if(&args[0])
        }
        Opcode::For => decode_for(args),

        Opcode::Statements => {
            expect_arity(opcode, args, 1)?;
            Ok(Node::Statements(decode_statement_list(&args[0], opcode)?))
        }

        Opcode::Var => {
            expect_arity(opcode, args, 2)?;
            let name = args[0]
                .as_str()
                .ok_or_else(|| malformed(opcode, "variable name must be a string"))?;
            Ok(Node::var(name, decode_node(&args[1])?))
        }

        Opcode::Selector => decode_selector(args),
        Opcode::Call => decode_call(args),

        Opcode::Import => {
            expect_arity(opcode, args, 1)?;
            let path = args[0]
                .as_str()
                .ok_or_else(|| malformed(opcode, "import path must be a string"))?;
            Ok(Node::Import(path.to_string()))
        }

        Opcode::Macro => decode_macro(args),
    }
}

fn expect_arity(opcode: Opcode, args: &[Json], arity: usize) -> Result<(), DecodeError> {
    if args.len() == arity {
        Ok(())
    } else {
        Err(malformed(
            opcode,
            format!("expected {arity} operand(s), found {}", args.len()),
        ))
    }
}

fn decode_binary(opcode: Opcode, args: &[Json], op: BinaryOp) -> Result<Node, DecodeError> {
    expect_arity(opcode, args, 2)?;
    Ok(Node::binary(op, decode_node(&args[0])?, decode_node(&args[1])?))
}

fn decode_unary(opcode: Opcode, args: &[Json], op: UnaryOp) -> Result<Node, DecodeError> {
    expect_arity(opcode, args, 1)?;
    Ok(Node::unary(op, decode_node(&args[0])?))
}

fn decode_map(arg: &Json) -> Result<Node, DecodeError> {
    let opcode = Opcode::Map;
    let raw_entries = arg
        .as_array()
        .ok_or_else(|| malformed(opcode, "expected an entry list"))?;
    let mut entries = Vec::with_capacity(raw_entries.len());
    for raw in raw_entries {
        let pair = raw
            .as_array()
            .ok_or_else(|| malformed(opcode, "entry must be a [key, value] pair"))?;
        let (key, value) = match pair.len() {
            // Keyless entry: takes the next auto index.
            1 => (None, &pair[0]),
            2 => {
                let key = match &pair[0] {
                    Json::Null => None,
                    Json::Number(n) => {
                        let index = n
                            .as_u64()
                            .ok_or_else(|| malformed(opcode, "integer keys must be non-negative"))?;
                        Some(MapKey::Index(index))
                    }
                    Json::String(name) => Some(MapKey::Name(name.clone())),
                    other => {
                        return Err(malformed(
                            opcode,
                            format!("key must be absent, an integer or a string, found {}", json_kind(other)),
                        ))
                    }
                };
                (key, &pair[1])
            }
            len => return Err(malformed(opcode, format!("entry pair has {len} elements"))),
        };
        entries.push(MapEntry {
            key,
            value: decode_node(value)?,
        });
    }
    Ok(Node::Map(entries))
}

fn decode_if(arg: &Json) -> Result<Node, DecodeError> {
    let opcode = Opcode::If;
    let raw_branches = arg
        .as_array()
        .ok_or_else(|| malformed(opcode, "expected a branch list"))?;
    if raw_branches.is_empty() {
        return Err(malformed(opcode, "branch list is empty"));
    }
    let mut branches = Vec::with_capacity(raw_branches.len());
    for raw in raw_branches {
        let pair = raw
            .as_array()
            .filter(|pair| pair.len() == 2)
            .ok_or_else(|| malformed(opcode, "branch must be a [condition, body] pair"))?;
        branches.push(IfBranch {
            condition: decode_node(&pair[0])?,
            body: decode_statement_list(&pair[1], opcode)?,
        });
    }
    Ok(Node::If(branches))
}

fn decode_for(args: &[Json]) -> Result<Node, DecodeError> {
    let opcode = Opcode::For;
    if args.len() != 3 && args.len() != 4 {
        return Err(malformed(
            opcode,
            "expected iterator names, collection, body, optional else-body",
        ));
    }
    let vars = args[0]
        .as_array()
        .ok_or_else(|| malformed(opcode, "iterator names must be a string list"))?;
    if vars.is_empty() || vars.len() > 2 {
        return Err(malformed(opcode, "expected one or two iterator names"));
    }
    let value_var = vars[0]
        .as_str()
        .ok_or_else(|| malformed(opcode, "iterator name must be a string"))?
        .to_string();
    let key_var = match vars.get(1) {
        Some(name) => Some(
            name.as_str()
                .ok_or_else(|| malformed(opcode, "iterator name must be a string"))?
                .to_string(),
        ),
        None => None,
    };
    let else_body = match args.get(3) {
        Some(body) => Some(decode_statement_list(body, opcode)?),
        None => None,
    };
    Ok(Node::For(Box::new(ForLoop {
        value_var,
        key_var,
        collection: decode_node(&args[1])?,
        body: decode_statement_list(&args[2], opcode)?,
        else_body,
    })))
}

fn decode_selector(args: &[Json]) -> Result<Node, DecodeError> {
    let opcode = Opcode::Selector;
    let (first, rest) = args
        .split_first()
        .ok_or_else(|| malformed(opcode, "selector path is empty"))?;
    let base = match first {
        Json::String(s) if s == "this" => SelectorBase::Context,
        Json::String(s) if s == "global" => SelectorBase::Global,
        Json::String(s) => SelectorBase::Name(s.clone()),
        other => SelectorBase::Expr(Box::new(decode_node(other)?)),
    };
    let mut path = Vec::with_capacity(rest.len());
    for segment in rest {
        path.push(match segment {
            Json::String(name) => PathSegment::Prop(name.clone()),
            other => PathSegment::Expr(decode_node(other)?),
        });
    }
    Ok(Node::Selector { base, path })
}

fn decode_call(args: &[Json]) -> Result<Node, DecodeError> {
    let opcode = Opcode::Call;
    if args.len() != 2 && args.len() != 3 {
        return Err(malformed(opcode, "expected target, name, optional arguments"));
    }
    let target = match &args[0] {
        Json::Null => None,
        other => Some(decode_node(other)?),
    };
    let name = match &args[1] {
        Json::String(name) => CallName::Literal(name.clone()),
        other => CallName::Computed(decode_node(other)?),
    };
    let call_args = match args.get(2) {
        None | Some(Json::Null) => Vec::new(),
        Some(list) => {
            let items = list
                .as_array()
                .ok_or_else(|| malformed(opcode, "arguments must be a node list"))?;
            items.iter().map(decode_node).collect::<Result<_, _>>()?
        }
    };
    Ok(Node::Call(Box::new(CallExpr {
        target,
        name,
        args: call_args,
    })))
}

fn decode_macro(args: &[Json]) -> Result<Node, DecodeError> {
    let opcode = Opcode::Macro;
    expect_arity(opcode, args, 3)?;
    let name = args[0]
        .as_str()
        .ok_or_else(|| malformed(opcode, "macro name must be a string"))?
        .to_string();
    let raw_params = args[1]
        .as_array()
        .ok_or_else(|| malformed(opcode, "parameter list must be a string list"))?;
    let mut params = Vec::with_capacity(raw_params.len());
    for param in raw_params {
        params.push(
            param
                .as_str()
                .ok_or_else(|| malformed(opcode, "parameter name must be a string"))?
                .to_string(),
        );
    }
    Ok(Node::Macro(Box::new(MacroDecl {
        name,
        params,
        body: decode_statement_list(&args[2], opcode)?,
    })))
}

// Encoding

/// Encode a statement list back into the JSON wire form.
pub fn encode_template(nodes: &[Node]) -> Json {
    Json::Array(nodes.iter().map(encode_statement).collect())
}

fn encode_statement(node: &Node) -> Json {
    match node {
        Node::Text(text) => Json::String(text.clone()),
        other => encode_node(other),
    }
}

/// Encode one node into its tagged array form.
///
/// `Text` in expression position has no wire form of its own and encodes as
/// a STRING literal.
pub fn encode_node(node: &Node) -> Json {
    match node {
        Node::Text(text) | Node::Str(text) => json!([Opcode::String.code(), text]),
        Node::True => json!([Opcode::True.code()]),
        Node::False => json!([Opcode::False.code()]),
        Node::Null => json!([Opcode::Null.code()]),
        Node::Int(n) => json!([Opcode::Int.code(), n]),
        Node::Double(n) => json!([Opcode::Double.code(), n]),
        Node::Map(entries) => {
            let encoded: Vec<Json> = entries
                .iter()
                .map(|entry| {
                    let key = match &entry.key {
                        None => Json::Null,
                        Some(MapKey::Index(index)) => json!(index),
                        Some(MapKey::Name(name)) => json!(name),
                    };
                    json!([key, encode_node(&entry.value)])
                })
                .collect();
            json!([Opcode::Map.code(), encoded])
        }
        Node::Binary { op, left, right } => {
            json!([binary_opcode(*op).code(), encode_node(left), encode_node(right)])
        }
        Node::Unary { op, operand } => {
            let opcode = match op {
                UnaryOp::Negate => Opcode::Negate,
                UnaryOp::Not => Opcode::Not,
            };
            json!([opcode.code(), encode_node(operand)])
        }
        Node::Ternary {
            condition,
            then_branch,
            else_branch,
        } => match else_branch {
            Some(else_branch) => json!([
                Opcode::Ternary.code(),
                encode_node(condition),
                encode_node(then_branch),
                encode_node(else_branch),
            ]),
            None => json!([
                Opcode::Ternary.code(),
                encode_node(condition),
                encode_node(then_branch),
            ]),
        },
        Node::If(branches) => {
            let encoded: Vec<Json> = branches
                .iter()
                .map(|branch| json!([encode_node(&branch.condition), encode_template(&branch.body)]))
                .collect();
            json!([Opcode::If.code(), encoded])
        }
        Node::For(for_loop) => {
            let vars = match &for_loop.key_var {
                Some(key_var) => json!([for_loop.value_var, key_var]),
                None => json!([for_loop.value_var]),
            };
            match &for_loop.else_body {
                Some(else_body) => json!([
                    Opcode::For.code(),
                    vars,
                    encode_node(&for_loop.collection),
                    encode_template(&for_loop.body),
                    encode_template(else_body),
                ]),
                None => json!([
                    Opcode::For.code(),
                    vars,
                    encode_node(&for_loop.collection),
                    encode_template(&for_loop.body),
                ]),
            }
        }
        Node::Statements(body) => json!([Opcode::Statements.code(), encode_template(body)]),
        Node::Var { name, expr } => json!([Opcode::Var.code(), name, encode_node(expr)]),
        Node::Selector { base, path } => {
            let mut parts = vec![Json::from(Opcode::Selector.code())];
            parts.push(match base {
                SelectorBase::Context => json!("this"),
                SelectorBase::Global => json!("global"),
                SelectorBase::Name(name) => json!(name),
                SelectorBase::Expr(expr) => encode_node(expr),
            });
            for segment in path {
                parts.push(match segment {
                    PathSegment::Prop(name) => json!(name),
                    PathSegment::Expr(expr) => encode_node(expr),
                });
            }
            Json::Array(parts)
        }
        Node::Call(call) => {
            let target = match &call.target {
                Some(target) => encode_node(target),
                None => Json::Null,
            };
            let name = match &call.name {
                CallName::Literal(name) => json!(name),
                CallName::Computed(expr) => encode_node(expr),
            };
            let args = Json::Array(call.args.iter().map(encode_node).collect());
            json!([Opcode::Call.code(), target, name, args])
        }
        Node::Import(path) => json!([Opcode::Import.code(), path]),
        Node::Macro(decl) => json!([
            Opcode::Macro.code(),
            decl.name,
            decl.params,
            encode_template(&decl.body),
        ]),
    }
}

fn binary_opcode(op: BinaryOp) -> Opcode {
    match op {
        BinaryOp::Add => Opcode::Add,
        BinaryOp::Sub => Opcode::Sub,
        BinaryOp::Mul => Opcode::Mul,
        BinaryOp::Div => Opcode::Div,
        BinaryOp::Mod => Opcode::Mod,
        BinaryOp::Or => Opcode::Or,
        BinaryOp::And => Opcode::And,
        BinaryOp::Equal => Opcode::Equal,
        BinaryOp::NotEqual => Opcode::NotEqual,
        BinaryOp::LessThan => Opcode::LessThan,
        BinaryOp::LessOrEqual => Opcode::LessOrEqual,
        BinaryOp::GreaterThan => Opcode::GreaterThan,
        BinaryOp::GreaterOrEqual => Opcode::GreaterOrEqual,
    }
}

// Parser adapter

/// [`TemplateParser`] over the JSON wire form.
///
/// "Source text" here is the serialized tagged tree itself; syntax errors
/// carry the JSON error line so callers see where the document broke.
#[derive(Clone, Copy, Default, Debug)]
pub struct JsonAstParser;

impl TemplateParser for JsonAstParser {
    fn parse(&self, source: &str) -> Result<Vec<Node>, ParseError> {
        let root: Json = serde_json::from_str(source).map_err(|err| ParseError {
            line: u32::try_from(err.line()).unwrap_or(u32::MAX),
            expected: "well-formed template tree".to_string(),
            found: err.to_string(),
        })?;
        decode_template(&root).map_err(|err| ParseError {
            line: 0,
            expected: "tagged node sequence".to_string(),
            found: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests;
