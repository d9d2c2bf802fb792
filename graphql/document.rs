//! Structured GraphQL operations: build them in code, print them into documents and parse them back.
//!
//! Only the executable subset needed for declared operations is modelled: a single
//! operation with variable definitions, fields, arguments and nested selections.
//! Fragments and directives are not supported.

use crate::*;
use async_graphql_parser::{
    parse_query,
    types::{BaseType, OperationType, Selection, SelectionSet, Type},
    Pos, Positioned,
};
use async_graphql_value::Value as GqlValue;
use std::fmt::{self, Display, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
        }
    }
}

/// Type annotation of a variable like `String!` or `[Int]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Named(String),
    NonNull(Box<InputType>),
    List(Box<InputType>),
}

impl InputType {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn non_null(self) -> Self {
        match self {
            Self::NonNull(_) => self,
            other => Self::NonNull(Box::new(other)),
        }
    }

    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }
}

impl Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputType::Named(name) => f.write_str(name),
            InputType::NonNull(inner) => write!(f, "{inner}!"),
            InputType::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    pub ty: InputType,
}

impl VariableDefinition {
    pub fn new(name: impl Into<String>, ty: InputType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl Display for VariableDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}: {}", self.name, self.ty)
    }
}

/// Argument value, either a literal or a reference to an operation variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Variable(String),
    String(String),
    Int(i64),
    Boolean(bool),
    Null,
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Collects the names of all variables referenced by this value
    fn collect_variables<'a>(&'a self, into: &mut Vec<&'a str>) {
        match self {
            Value::Variable(name) => into.push(name),
            Value::List(items) => items.iter().for_each(|v| v.collect_variables(into)),
            Value::Object(entries) => entries.iter().for_each(|(_, v)| v.collect_variables(into)),
            _ => {}
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Variable(name) => write!(f, "${name}"),
            Value::String(s) => {
                // JSON string escaping is a valid GraphQL string literal
                let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
                f.write_str(&quoted)
            }
            Value::Int(i) => write!(f, "{i}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Null => f.write_str("null"),
            Value::List(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            Value::Object(entries) if entries.is_empty() => f.write_str("{}"),
            Value::Object(entries) => {
                f.write_str("{ ")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selection: Vec<Field>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: vec![],
            selection: vec![],
        }
    }

    pub fn arg(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.push(Argument {
            name: name.into(),
            value,
        });
        self
    }

    pub fn select(mut self, field: Field) -> Self {
        self.selection.push(field);
        self
    }

    /// Adds a leaf field for every name
    pub fn select_all<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.selection.extend(names.into_iter().map(Field::new));
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.selection.iter().find(|f| f.name == name)
    }

    fn write_indented(&self, out: &mut String, depth: usize) -> fmt::Result {
        push_indent(out, depth);
        out.push_str(&self.name);
        if !self.arguments.is_empty() {
            out.push('(');
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write!(out, "{}: {}", arg.name, arg.value)?;
            }
            out.push(')');
        }
        if !self.selection.is_empty() {
            out.push_str(" {\n");
            for field in &self.selection {
                field.write_indented(out, depth + 1)?;
            }
            push_indent(out, depth);
            out.push('}');
        }
        out.push('\n');
        Ok(())
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Shape of the data requested back by a selection set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Leaf(String),
    Nested(String, Vec<Shape>),
}

impl Shape {
    fn of(field: &Field) -> Self {
        if field.selection.is_empty() {
            Shape::Leaf(field.name.clone())
        } else {
            Shape::Nested(field.name.clone(), field.selection.iter().map(Shape::of).collect())
        }
    }
}

/// A single executable GraphQL operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub kind: OperationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub variables: Vec<VariableDefinition>,
    pub selection: Vec<Field>,
}

impl Operation {
    pub fn mutation() -> Self {
        Self::new(OperationKind::Mutation)
    }

    pub fn query() -> Self {
        Self::new(OperationKind::Query)
    }

    fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            name: None,
            variables: vec![],
            selection: vec![],
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn var(mut self, name: impl Into<String>, ty: InputType) -> Self {
        self.variables.push(VariableDefinition::new(name, ty));
        self
    }

    pub fn select(mut self, field: Field) -> Self {
        self.selection.push(field);
        self
    }

    pub fn variable(&self, name: &str) -> Option<&VariableDefinition> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn variables(&self) -> &[VariableDefinition] {
        &self.variables
    }

    /// Names of variables referenced anywhere in field arguments, in document order
    pub fn referenced_variables(&self) -> Vec<&str> {
        fn walk<'a>(fields: &'a [Field], into: &mut Vec<&'a str>) {
            for field in fields {
                for arg in &field.arguments {
                    arg.value.collect_variables(into);
                }
                walk(&field.selection, into);
            }
        }
        let mut names = vec![];
        walk(&self.selection, &mut names);
        names
    }

    /// Shape requested back from each root field
    pub fn returning_shape(&self) -> Vec<Shape> {
        self.selection.iter().map(Shape::of).collect()
    }

    /// Text of the operation as sent over the wire
    pub fn document(&self) -> String {
        self.to_string()
    }

    /// Parses a document containing exactly one operation.
    ///
    /// Fragments, directives, aliases, default values and enum or float literals are rejected
    /// since the model has no place for them.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        check_nesting(source)?;
        let document = parse_query(source)?;
        if let Some((name, fragment)) = document.fragments.iter().next() {
            return Err(ParseError::at(format!("fragment '{name}' is not supported"), fragment.pos));
        }
        let mut operations = document.operations.iter();
        let Some((name, definition)) = operations.next() else {
            return Err(ParseError::at("document has no operation", Pos::default()));
        };
        if let Some((_, extra)) = operations.next() {
            return Err(ParseError::at("expected a single operation", extra.pos));
        }

        let node = &definition.node;
        let kind = match node.ty {
            OperationType::Query => OperationKind::Query,
            OperationType::Mutation => OperationKind::Mutation,
            OperationType::Subscription => {
                return Err(ParseError::at("subscriptions are not supported", definition.pos))
            }
        };
        if let Some(directive) = node.directives.first() {
            return Err(ParseError::at("directives are not supported", directive.pos));
        }

        let mut operation = Operation::new(kind);
        operation.name = name.map(|n| n.to_string());
        for variable in &node.variable_definitions {
            let name = variable.node.name.node.to_string();
            if operation.variable(&name).is_some() {
                return Err(ParseError::at(
                    format!("variable '${name}' is defined more than once"),
                    variable.pos,
                ));
            }
            if variable.node.default_value.is_some() {
                return Err(ParseError::at("default values are not supported", variable.pos));
            }
            let ty = convert_type(&variable.node.var_type.node);
            operation.variables.push(VariableDefinition { name, ty });
        }
        operation.selection = convert_selection(&node.selection_set)?;
        Ok(operation)
    }
}

/// Prints the canonical document.
///
/// An operation without any selected field prints as `kind {\n}`, which is not valid GraphQL;
/// [`GraphQlRequest::new`] refuses to send such operations.
impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.keyword())?;
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        if !self.variables.is_empty() {
            f.write_char('(')?;
            for (i, var) in self.variables.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{var}")?;
            }
            f.write_char(')')?;
        }
        let mut body = String::new();
        for field in &self.selection {
            field.write_indented(&mut body, 1)?;
        }
        write!(f, " {{\n{body}}}")
    }
}

impl std::str::FromStr for Operation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::parse(s)
    }
}

/// Parse failure with the location it occured at
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    fn at(message: impl Into<String>, pos: Pos) -> Self {
        Self {
            message: message.into(),
            line: pos.line.max(1),
            column: pos.column.max(1),
        }
    }
}

impl From<async_graphql_parser::Error> for ParseError {
    fn from(err: async_graphql_parser::Error) -> Self {
        let pos = err.positions().next().unwrap_or_default();
        Self::at(err.to_string(), pos)
    }
}

/// Deepest bracket nesting accepted by [`Operation::parse`]
pub const MAX_NESTING: usize = 64;

/// The grammar is parsed recursively, so overly nested input is refused before parsing
fn check_nesting(source: &str) -> Result<(), ParseError> {
    let mut depth = 0usize;
    let (mut line, mut column) = (1, 1);
    let (mut in_string, mut escaped, mut in_comment) = (false, false, false);
    for c in source.chars() {
        if in_comment {
            in_comment = c != '\n';
        } else if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
        } else {
            match c {
                '#' => in_comment = true,
                '"' => in_string = true,
                '{' | '[' | '(' => {
                    depth += 1;
                    if depth > MAX_NESTING {
                        return Err(ParseError::at(
                            format!("nesting deeper than {MAX_NESTING} levels"),
                            Pos { line, column },
                        ));
                    }
                }
                '}' | ']' | ')' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    Ok(())
}

fn convert_type(ty: &Type) -> InputType {
    let base = match &ty.base {
        BaseType::Named(name) => InputType::named(name.as_str()),
        BaseType::List(inner) => convert_type(inner).list(),
    };
    if ty.nullable {
        base
    } else {
        base.non_null()
    }
}

fn convert_selection(set: &Positioned<SelectionSet>) -> Result<Vec<Field>, ParseError> {
    let mut fields = Vec::with_capacity(set.node.items.len());
    for item in &set.node.items {
        let Selection::Field(field) = &item.node else {
            return Err(ParseError::at("fragments are not supported", item.pos));
        };
        let node = &field.node;
        if let Some(alias) = &node.alias {
            return Err(ParseError::at("aliases are not supported", alias.pos));
        }
        if let Some(directive) = node.directives.first() {
            return Err(ParseError::at("directives are not supported", directive.pos));
        }
        let mut converted = Field::new(node.name.node.as_str());
        for (name, value) in &node.arguments {
            converted.arguments.push(Argument {
                name: name.node.to_string(),
                value: convert_value(&value.node, value.pos)?,
            });
        }
        converted.selection = convert_selection(&node.selection_set)?;
        fields.push(converted);
    }
    Ok(fields)
}

fn convert_value(value: &GqlValue, pos: Pos) -> Result<Value, ParseError> {
    Ok(match value {
        GqlValue::Variable(name) => Value::Variable(name.to_string()),
        GqlValue::Null => Value::Null,
        GqlValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => return Err(ParseError::at(format!("number {n} is not an integer"), pos)),
        },
        GqlValue::String(s) => Value::String(s.clone()),
        GqlValue::Boolean(b) => Value::Boolean(*b),
        GqlValue::List(items) => Value::List(
            items
                .iter()
                .map(|item| convert_value(item, pos))
                .collect::<Result<Vec<_>, ParseError>>()?,
        ),
        GqlValue::Object(entries) => {
            let mut converted = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                converted.push((key.to_string(), convert_value(value, pos)?));
            }
            Value::Object(converted)
        }
        other => return Err(ParseError::at(format!("value {other} is not supported"), pos)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_nested_selection_with_two_space_indent() {
        let op = Operation::query().named("Todos").select(
            Field::new("todos")
                .arg("limit", Value::Int(10))
                .select_all(["id", "title"]),
        );
        assert_eq!(
            op.document(),
            "query Todos {\n  todos(limit: 10) {\n    id\n    title\n  }\n}"
        );
        assert_eq!(Operation::parse(&op.document()).unwrap(), op);
    }

    #[test]
    fn parses_anonymous_shorthand_query() {
        let op = Operation::parse("{ todos { id } }").unwrap();
        assert_eq!(op.kind, OperationKind::Query);
        assert_eq!(op.name, None);
        assert_eq!(
            op.returning_shape(),
            vec![Shape::Nested("todos".into(), vec![Shape::Leaf("id".into())])]
        );
    }

    #[test]
    fn parses_list_and_non_null_types() {
        let op = Operation::parse("query($ids: [Int!]!) { todos(where: { id: { _in: $ids } }) { id } }")
            .unwrap();
        let ids = op.variable("ids").unwrap();
        assert_eq!(ids.ty.to_string(), "[Int!]!");
        assert!(ids.ty.is_non_null());
        assert_eq!(op.referenced_variables(), vec!["ids"]);
    }

    #[test]
    fn comments_and_commas_are_ignored() {
        let source = "mutation Add($a: String!, $b: Boolean!) { # insert\n  add(a: $a, b: $b) { ok } }";
        let op = Operation::parse(source).unwrap();
        assert_eq!(op.name.as_deref(), Some("Add"));
        assert_eq!(op.variables().len(), 2);
        assert_eq!(op.selection[0].arguments.len(), 2);
    }

    #[test]
    fn string_literals_keep_escapes() {
        let op = Operation::query()
            .select(Field::new("search").arg("text", Value::String("say \"hi\"\n".into())).select_all(["id"]));
        let printed = op.document();
        assert!(printed.contains(r#"text: "say \"hi\"\n""#));
        assert_eq!(Operation::parse(&printed).unwrap(), op);
    }

    #[test]
    fn object_arguments_keep_their_order() {
        let op = Operation::parse("mutation { add(objects: { title: $t, is_public: $p }) { id } }").unwrap();
        let Value::Object(entries) = &op.selection[0].arguments[0].value else {
            panic!("objects should stay an object")
        };
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["title", "is_public"]);
    }

    #[test]
    fn reports_end_of_input_location() {
        let err = Operation::parse("mutation { f(a: ").unwrap_err();
        assert_eq!((err.line, err.column), (1, 17), "{err}");
    }

    #[test]
    fn deep_nesting_is_an_error_not_a_crash() {
        let source = format!("query {{ f(a: {}1{}) }}", "[".repeat(200_000), "]".repeat(200_000));
        let err = Operation::parse(&source).unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("nesting"), "{err}");

        let nested = format!("query {{ f(a: {}1{}) }}", "[".repeat(60), "]".repeat(60));
        assert!(Operation::parse(&nested).is_ok());
        // brackets inside strings and comments do not count
        let quoted = format!("query {{ f(a: \"{}\") }} # {}", "[".repeat(100), "{".repeat(100));
        assert!(Operation::parse(&quoted).is_ok());
    }

    #[test]
    fn rejects_what_the_model_cannot_hold() {
        assert!(Operation::parse("query($a: Int, $a: Int) { x }").is_err());
        assert!(Operation::parse("query { x } query { y }").is_err());
        assert!(Operation::parse("query { }").is_err());
        assert!(Operation::parse("query { x(a: \"open) }").is_err());
        assert!(Operation::parse("query { first: x }").is_err());
        assert!(Operation::parse("query { x(order: asc) }").is_err());
        assert!(Operation::parse("query { x(ratio: 0.5) }").is_err());
        assert!(Operation::parse("query { ...Todo } fragment Todo on todos { id }").is_err());
        assert!(Operation::parse("subscription { todos { id } }").is_err());
    }
}
