use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::constants;
use crate::error::{AacError, AacResult};
use crate::graphql_fields::FieldSelection;
use crate::logging::log_debug;
use crate::models::GraphQLResponse;

/// Executes GraphQL documents against a graph API.
///
/// Implementations return the response `data` object; transport failures,
/// non-success statuses and GraphQL `errors` all surface as errors.
#[async_trait]
pub trait GraphTransport: Send + Sync {
    async fn query(&self, document: &str, variables: Value) -> AacResult<Value>;
}

/// GraphQL client for the GitHub v4 API
pub struct GraphQLClient {
    client: Client,
    api_url: String,
}

impl GraphQLClient {
    pub fn new(api_url: &str, token: &str) -> AacResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(constants::USER_AGENT));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AacError::ConfigError("token contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Execute a raw GraphQL request
    async fn execute(&self, document: &str, variables: Value) -> AacResult<GraphQLResponse> {
        let request_body = GraphQLRequest {
            query: document,
            variables,
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&request_body)
            .send()
            .await
            .map_err(AacError::RequestError)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AacError::ApiError(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        response
            .json::<GraphQLResponse>()
            .await
            .map_err(AacError::RequestError)
    }
}

#[async_trait]
impl GraphTransport for GraphQLClient {
    async fn query(&self, document: &str, variables: Value) -> AacResult<Value> {
        log_debug(&format!(
            "query {} {}",
            operation_name(document).unwrap_or("<anonymous>"),
            variables
        ));
        let response = self.execute(document, variables).await?;
        extract_data(response)
    }
}

/// Extract data from GraphQL response, handling errors
pub fn extract_data(response: GraphQLResponse) -> AacResult<Value> {
    if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
        let error_messages = errors
            .iter()
            .map(|e| match &e.kind {
                Some(kind) => format!("{} ({})", e.message, kind),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AacError::GraphQLError(error_messages));
    }

    response
        .data
        .ok_or_else(|| AacError::GraphQLError("No data in response".to_string()))
}

/// Name of the operation declared by `document`, e.g. `Teams` for
/// `query Teams($org: String!) { ... }`.
pub fn operation_name(document: &str) -> Option<&str> {
    let rest = document.trim_start().strip_prefix("query")?.trim_start();
    let end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

#[derive(Debug, Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    variables: Value,
}

/// Builder for named GraphQL queries with declared variables
pub struct QueryBuilder {
    name: String,
    variables: Vec<(String, String)>,
    selection: FieldSelection,
}

impl QueryBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            variables: Vec::new(),
            selection: FieldSelection::new(),
        }
    }

    /// Declare a variable, e.g. `variable("org", "String!")`.
    pub fn variable(mut self, name: &str, graphql_type: &str) -> Self {
        self.variables.push((name.to_string(), graphql_type.to_string()));
        self
    }

    pub fn selection(mut self, selection: FieldSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn build(self) -> String {
        if self.variables.is_empty() {
            format!("query {} {{ {} }}", self.name, self.selection)
        } else {
            let vars_str = self
                .variables
                .iter()
                .map(|(k, v)| format!("${}: {}", k, v))
                .collect::<Vec<_>>()
                .join(", ");
            format!("query {}({}) {{ {} }}", self.name, vars_str, self.selection)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GraphQLError;
    use serde_json::json;

    #[test]
    fn builds_named_query_with_variables() {
        let query = QueryBuilder::new("Viewer")
            .variable("org", "String!")
            .variable("cursor", "String")
            .selection(FieldSelection::new().field("login"))
            .build();

        assert_eq!(query, "query Viewer($org: String!, $cursor: String) { login }");
        assert_eq!(operation_name(&query), Some("Viewer"));
    }

    #[test]
    fn anonymous_documents_have_no_operation_name() {
        assert_eq!(operation_name("query { viewer { login } }"), None);
        assert_eq!(operation_name("mutation X { y }"), None);
    }

    #[test]
    fn graphql_errors_win_over_partial_data() {
        let response = GraphQLResponse {
            data: Some(json!({"organization": null})),
            errors: Some(vec![GraphQLError {
                message: "Could not resolve to an Organization".to_string(),
                kind: Some("NOT_FOUND".to_string()),
            }]),
        };

        let err = extract_data(response).unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("NOT_FOUND"));
    }

    #[test]
    fn empty_error_list_is_not_an_error() {
        let response = GraphQLResponse {
            data: Some(json!({"organization": {}})),
            errors: Some(Vec::new()),
        };
        assert!(extract_data(response).is_ok());
    }
}
