use crate::*;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};

/// Body of a GraphQL-over-HTTP request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(default)]
    pub variables: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphQlRequest {
    /// Fails with [`Error::EmptySelection`] when the operation selects nothing
    pub fn new<V: Serialize>(operation: &Operation, variables: V) -> Result<Self> {
        if operation.selection.is_empty() {
            return Err(Error::EmptySelection);
        }
        Ok(Self {
            query: operation.document(),
            variables: serde_json::to_value(variables)?,
            operation_name: operation.name.clone(),
        })
    }
}

/// Standard GraphQL response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlResponse<T = serde_json::Value> {
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQlError>,
}

impl<T> GraphQlResponse<T> {
    /// Any reported error wins over partial data
    pub fn into_result(self) -> Result<T> {
        if !self.errors.is_empty() {
            return Err(Error::GraphQl(self.errors));
        }
        self.data.ok_or(Error::MissingData)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<serde_json::Value>,
}

impl GraphQlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: vec![],
        }
    }
}

/// Capability to run a declared mutation somewhere, passed explicitly to whoever needs it
#[async_trait]
pub trait ExecuteMutation: Send + Sync {
    async fn execute(&self, request: GraphQlRequest) -> Result<GraphQlResponse>;
}

/// Executes operations by posting them to a GraphQL endpoint over HTTP
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
    endpoint: String,
    headers: HeaderMap,
}

impl HttpExecutor {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            headers: HeaderMap::new(),
        }
    }

    pub fn bearer(self, token: &str) -> Result<Self> {
        self.header(AUTHORIZATION.as_str(), &format!("Bearer {token}"))
    }

    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::InvalidHeader(name.to_owned()))?;
        let value =
            HeaderValue::from_str(value).map_err(|_| Error::InvalidHeader(name.as_str().to_owned()))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ExecuteMutation for HttpExecutor {
    async fn execute(&self, request: GraphQlRequest) -> Result<GraphQlResponse> {
        debug!(endpoint = %self.endpoint, "Sending GraphQL operation");
        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, "GraphQL endpoint responded with {status}");
            return Err(Error::Status(status.as_u16()));
        }
        Ok(response.json::<GraphQlResponse>().await?)
    }
}

#[derive(Deserialize)]
struct InsertTodosData {
    insert_todos: InsertTodos,
}

/// Runs [`ADD_TODO`] for the given todo through the provided executor
pub async fn add_todo(executor: &dyn ExecuteMutation, todo: NewTodo) -> Result<InsertTodos> {
    let request = GraphQlRequest::new(&ADD_TODO, AddTodoVariables::from(todo))?;
    let data = executor.execute(request).await?.into_result()?;
    let InsertTodosData { insert_todos } = serde_json::from_value(data)?;
    debug!("Inserted {} todo(s)", insert_todos.affected_rows);
    Ok(insert_todos)
}
