//! Request/response framing over any async byte pipe.
//!
//! One JSON object per line in each direction. Every request is written,
//! flushed, and answered by exactly one line before the next is sent.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use super::error::TransportError;
use super::protocol::{self, Notification, PendingRequest, Response};
use super::provider::{ToolDescriptor, ToolInvocationResult, ToolProvider};
use crate::util::preview;

const RESULT_PREVIEW_CHARS: usize = 200;

pub struct McpConnection<R, W> {
    reader: R,
    writer: W,
    next_id: u64,
}

impl<R, W> McpConnection<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            next_id: 0,
        }
    }

    /// Id of the most recently sent request (0 before the first one)
    pub fn last_request_id(&self) -> u64 {
        self.next_id
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// `initialize` request followed by the `initialized` notification
    pub async fn initialize(&mut self) -> Result<Value, TransportError> {
        let response = self
            .request(protocol::METHOD_INITIALIZE, Some(protocol::initialize_params()))
            .await?;
        let result = response.into_result();
        debug!(
            "MCP initialized: {}",
            result.get("serverInfo").cloned().unwrap_or_default()
        );

        self.notify(protocol::METHOD_INITIALIZED).await?;
        Ok(result)
    }

    pub async fn request(
        &mut self,
        method: &str,
        params: Option<Value>,
    ) -> Result<Response, TransportError> {
        let request = PendingRequest::new(self.allocate_id(), method, params);

        debug!("Request: {} (id {})", request.method, request.id);
        if let Some(params) = &request.params {
            debug!("  Params: {}", params);
        }

        self.write_line(method, &request).await?;
        let response = self.read_response(method).await?;

        // A line without an id (e.g. a server notification) is not our reply
        let actual = response.id.clone().unwrap_or(Value::Null);
        if actual.as_u64() != Some(request.id) {
            return Err(TransportError::UnexpectedId {
                expected: request.id,
                actual,
            });
        }

        if let Some(error) = &response.error {
            debug!("Error: {}", error);
        } else if let Some(result) = &response.result {
            debug!(
                "Result: {}...",
                preview(&result.to_string(), RESULT_PREVIEW_CHARS)
            );
        }

        Ok(response)
    }

    pub async fn notify(&mut self, method: &str) -> Result<(), TransportError> {
        debug!("Notification: {}", method);
        self.write_line(method, &Notification::new(method)).await
    }

    async fn write_line<T: Serialize>(
        &mut self,
        method: &str,
        message: &T,
    ) -> Result<(), TransportError> {
        let mut encoded = serde_json::to_vec(message).map_err(|source| TransportError::Encode {
            method: method.to_string(),
            source,
        })?;
        encoded.push(b'\n');

        let write_err = |source| TransportError::Write {
            method: method.to_string(),
            source,
        };
        self.writer.write_all(&encoded).await.map_err(write_err)?;
        self.writer.flush().await.map_err(write_err)
    }

    async fn read_response(&mut self, method: &str) -> Result<Response, TransportError> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|source| TransportError::Read {
                method: method.to_string(),
                source,
            })?;

        if read == 0 {
            return Err(TransportError::NoResponse {
                method: method.to_string(),
            });
        }

        serde_json::from_str(line.trim_end()).map_err(|source| TransportError::MalformedResponse {
            method: method.to_string(),
            source,
        })
    }

    pub(crate) fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

#[async_trait]
impl<R, W> ToolProvider for McpConnection<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn list_tools(&mut self) -> Result<Vec<ToolDescriptor>, TransportError> {
        let result = self
            .request(protocol::METHOD_TOOLS_LIST, None)
            .await?
            .into_result();

        let entries = result
            .get("tools")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(ToolDescriptor::catalog(entries))
    }

    async fn call_tool(
        &mut self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolInvocationResult, TransportError> {
        let response = self
            .request(
                protocol::METHOD_TOOLS_CALL,
                Some(protocol::call_tool_params(name, arguments)),
            )
            .await?;

        if let Some(message) = response.error_message() {
            warn!("Tool error: {}", message);
            return Ok(ToolInvocationResult::Failure { message });
        }

        Ok(ToolInvocationResult::Success(response.into_result()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::BufReader;

    fn connection_with_replies(
        replies: &str,
    ) -> McpConnection<BufReader<&[u8]>, Vec<u8>> {
        McpConnection::new(BufReader::new(replies.as_bytes()), Vec::new())
    }

    fn sent_lines(connection: McpConnection<BufReader<&[u8]>, Vec<u8>>) -> Vec<Value> {
        let (_, written) = connection.into_parts();
        String::from_utf8(written)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_handshake_sends_request_then_notification() {
        let mut connection = connection_with_replies(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{\"serverInfo\":{\"name\":\"github-mcp-server\"}}}\n",
        );

        let result = connection.initialize().await.unwrap();
        assert_eq!(result["serverInfo"]["name"], "github-mcp-server");

        let sent = sent_lines(connection);
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0]["method"], "initialize");
        assert_eq!(sent[0]["id"], 1);
        assert_eq!(sent[0]["params"]["protocolVersion"], "2024-11-05");
        assert_eq!(sent[1], json!({"jsonrpc": "2.0", "method": "notifications/initialized"}));
    }

    #[tokio::test]
    async fn test_list_tools_without_tools_member_is_empty() {
        let mut connection = connection_with_replies("{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n");
        assert!(connection.list_tools().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_call_tool_error_is_not_a_transport_failure() {
        let mut connection = connection_with_replies(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"error\":{\"code\":-32603,\"message\":\"Not Found\"}}\n",
        );

        let result = connection
            .call_tool("get_pull_request", json!({"pullNumber": 1}))
            .await
            .unwrap();

        assert_eq!(result, ToolInvocationResult::failure("Not Found"));
    }

    #[tokio::test]
    async fn test_call_tool_sends_name_and_arguments() {
        let mut connection = connection_with_replies("{\"jsonrpc\":\"2.0\",\"id\":1}\n");

        let result = connection
            .call_tool("get_me", json!({"verbose": true}))
            .await
            .unwrap();
        assert_eq!(result, ToolInvocationResult::Success(json!({})));

        let sent = sent_lines(connection);
        assert_eq!(sent[0]["method"], "tools/call");
        assert_eq!(sent[0]["params"], json!({"name": "get_me", "arguments": {"verbose": true}}));
    }

    #[tokio::test]
    async fn test_end_of_stream_is_fatal() {
        let mut connection = connection_with_replies("");
        let err = connection.list_tools().await.unwrap_err();
        assert!(matches!(err, TransportError::NoResponse { ref method } if method == "tools/list"));
    }

    #[tokio::test]
    async fn test_garbage_line_is_fatal() {
        let mut connection = connection_with_replies("docker: image not found\n");
        let err = connection.list_tools().await.unwrap_err();
        assert!(matches!(err, TransportError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_mismatched_id_is_fatal() {
        let mut connection = connection_with_replies("{\"jsonrpc\":\"2.0\",\"id\":9,\"result\":{}}\n");
        let err = connection.list_tools().await.unwrap_err();
        assert!(matches!(err, TransportError::UnexpectedId { expected: 1, .. }));
    }

    #[tokio::test]
    async fn test_reply_without_id_is_fatal() {
        let mut connection = connection_with_replies(concat!(
            "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/message\",\"params\":{\"level\":\"info\"}}\n",
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{\"tools\":[{\"name\":\"get_me\"}]}}\n",
        ));

        let err = connection.list_tools().await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::UnexpectedId { expected: 1, actual: Value::Null }
        ));
    }

    #[tokio::test]
    async fn test_ids_strictly_increase() {
        let mut connection = connection_with_replies(concat!(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n",
            "{\"jsonrpc\":\"2.0\",\"id\":2,\"result\":{\"tools\":[]}}\n",
            "{\"jsonrpc\":\"2.0\",\"id\":3,\"result\":{}}\n",
        ));

        connection.initialize().await.unwrap();
        connection.list_tools().await.unwrap();
        connection.call_tool("get_me", json!({})).await.unwrap();
        assert_eq!(connection.last_request_id(), 3);

        let ids: Vec<u64> = sent_lines(connection)
            .iter()
            .filter_map(|message| message.get("id").and_then(Value::as_u64))
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
