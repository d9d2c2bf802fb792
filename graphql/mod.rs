use crate::*;

mod client;
pub use client::*;
mod document;
pub use document::*;

/// Inserts one todo into the `todos` collection and requests back the affected row count
/// together with the server-assigned fields of the inserted row
pub static ADD_TODO: Lazy<Operation> = Lazy::new(|| {
    Operation::mutation()
        .var("todo", InputType::named("String").non_null())
        .var("isPublic", InputType::named("Boolean").non_null())
        .select(
            Field::new("insert_todos")
                .arg(
                    "objects",
                    Value::object([
                        ("title", Value::variable("todo")),
                        ("is_public", Value::variable("isPublic")),
                    ]),
                )
                .select(Field::new("affected_rows"))
                .select(Field::new("returning").select_all(TODO_RETURNING_FIELDS)),
        )
});

/// Printed [`ADD_TODO`] document
pub static ADD_TODO_DOCUMENT: Lazy<String> = Lazy::new(|| ADD_TODO.document());

/// Fields of the todo record requested back after an insert
pub const TODO_RETURNING_FIELDS: [&str; 4] = ["id", "title", "created_at", "is_completed"];

/// Variables of [`ADD_TODO`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTodoVariables {
    pub todo: String,
    pub is_public: bool,
}

impl From<NewTodo> for AddTodoVariables {
    fn from(todo: NewTodo) -> Self {
        Self {
            todo: todo.title,
            is_public: todo.is_public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: &str = r#"mutation($todo: String!, $isPublic: Boolean!) {
  insert_todos(objects: { title: $todo, is_public: $isPublic }) {
    affected_rows
    returning {
      id
      title
      created_at
      is_completed
    }
  }
}"#;

    #[test]
    fn add_todo_prints_canonical_document() {
        assert_eq!(ADD_TODO_DOCUMENT.as_str(), EXPECTED);
        assert_eq!(Operation::parse(EXPECTED).unwrap(), *ADD_TODO);
    }

    #[test]
    fn add_todo_parameters_are_exactly_todo_and_is_public() {
        let params: Vec<(String, String)> = ADD_TODO
            .variables()
            .iter()
            .map(|v| (v.name.clone(), v.ty.to_string()))
            .collect();
        assert_eq!(
            params,
            vec![
                ("todo".to_owned(), "String!".to_owned()),
                ("isPublic".to_owned(), "Boolean!".to_owned())
            ]
        );
        assert_eq!(ADD_TODO.referenced_variables(), vec!["todo", "isPublic"]);
    }

    #[test]
    fn add_todo_returning_shape() {
        let leaves = |names: &[&str]| names.iter().map(|n| Shape::Leaf(n.to_string())).collect::<Vec<_>>();
        assert_eq!(
            ADD_TODO.returning_shape(),
            vec![Shape::Nested(
                "insert_todos".into(),
                vec![
                    Shape::Leaf("affected_rows".into()),
                    Shape::Nested("returning".into(), leaves(&TODO_RETURNING_FIELDS)),
                ]
            )]
        );
    }

    #[test]
    fn server_assigned_fields_are_never_inputs() {
        let insert = &ADD_TODO.selection[0];
        let Value::Object(objects) = &insert.arguments[0].value else {
            panic!("objects argument should be an object")
        };
        let keys: Vec<&str> = objects.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["title", "is_public"]);
        for server_field in ["id", "created_at"] {
            assert!(ADD_TODO.variable(server_field).is_none());
            assert!(insert.field("returning").unwrap().field(server_field).is_some());
        }
    }

    #[test]
    fn descriptor_survives_json_serialization() {
        let json = serde_json::to_string(&*ADD_TODO).unwrap();
        let decoded: Operation = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, *ADD_TODO);
        assert_eq!(decoded.document(), EXPECTED);
    }

    #[test]
    fn variables_use_graphql_names() {
        let vars = AddTodoVariables::from(NewTodo::new("Buy milk", true).unwrap());
        assert_eq!(
            serde_json::to_value(vars).unwrap(),
            json!({"todo": "Buy milk", "isPublic": true})
        );
    }
}
