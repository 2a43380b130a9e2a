//! IPC server for the pomoflow daemon.
//!
//! This module provides Unix Domain Socket IPC functionality:
//! - Server that listens on a Unix socket
//! - Request/response handling for timer commands
//! - Integration with TimerEngine for command execution

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};

use crate::types::{ConfigureParams, IpcRequest, IpcResponse, ResponseData, TimerMode};

use super::timer::{StartOutcome, TimerEngine};

// ============================================================================
// Constants
// ============================================================================

/// Default socket path, relative to the home directory
pub const DEFAULT_SOCKET_PATH: &str = ".pomoflow/pomoflow.sock";

/// Maximum request size in bytes (4KB)
const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// IpcError
// ============================================================================

/// IPC-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Socket binding error
    #[error("Failed to bind socket: {0}")]
    BindError(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Read error
    #[error("Failed to read request: {0}")]
    ReadError(String),

    /// Write error
    #[error("Failed to write response: {0}")]
    WriteError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Request too large
    #[error("Request too large (max {MAX_REQUEST_SIZE} bytes)")]
    RequestTooLarge,
}

/// Returns the default socket path under the home directory.
pub fn default_socket_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine the home directory")?;
    Ok(home.join(DEFAULT_SOCKET_PATH))
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix Domain Socket IPC server.
pub struct IpcServer {
    /// Unix socket listener
    listener: UnixListener,
    /// Socket path (for cleanup)
    socket_path: PathBuf,
}

impl IpcServer {
    /// Creates a new IPC server bound to the specified socket path.
    ///
    /// If the socket file already exists, it will be removed before binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound.
    pub fn new(socket_path: &Path) -> Result<Self> {
        // Remove existing socket file if present
        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .with_context(|| format!("Failed to remove existing socket: {:?}", socket_path))?;
        }

        // Ensure parent directory exists
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {:?}", parent))?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind Unix socket: {:?}", socket_path))?;

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Accepts an incoming client connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be accepted.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        Ok(stream)
    }

    /// Receives and deserializes an IPC request from the stream.
    ///
    /// Applies a read timeout to prevent blocking indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or deserialization fails.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest> {
        let mut buffer = vec![0u8; MAX_REQUEST_SIZE];

        let read_result = timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await;

        let n = match read_result {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(IpcError::ReadError(e.to_string()).into()),
            Err(_) => return Err(IpcError::Timeout.into()),
        };

        if n == 0 {
            anyhow::bail!("Connection closed by client");
        }

        let request: IpcRequest = serde_json::from_slice(&buffer[..n])
            .with_context(|| "Failed to deserialize IPC request")?;

        Ok(request)
    }

    /// Serializes and sends an IPC response to the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_vec(response).context("Failed to serialize IPC response")?;

        stream
            .write_all(&json)
            .await
            .context("Failed to write response")?;
        stream.flush().await.context("Failed to flush response")?;

        Ok(())
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        // Clean up socket file on drop
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Handles IPC requests by dispatching to TimerEngine.
pub struct RequestHandler {
    /// Shared reference to the timer engine
    engine: Arc<Mutex<TimerEngine>>,
}

impl RequestHandler {
    /// Creates a new request handler with the given timer engine.
    pub fn new(engine: Arc<Mutex<TimerEngine>>) -> Self {
        Self { engine }
    }

    /// Handles an IPC request and returns the appropriate response.
    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        match request {
            IpcRequest::Start => self.handle_start().await,
            IpcRequest::Pause => self.handle_pause().await,
            IpcRequest::Switch { mode } => self.handle_switch(mode).await,
            IpcRequest::Configure { params } => self.handle_configure(params).await,
            IpcRequest::Status => self.handle_status().await,
        }
    }

    /// Handles the start command.
    ///
    /// Starting is a total operation; no-op outcomes are still successes and
    /// only change the message.
    async fn handle_start(&self) -> IpcResponse {
        let mut engine = self.engine.lock().await;

        match engine.start() {
            Ok(outcome) => {
                let message = match outcome {
                    StartOutcome::Started => "Timer started",
                    StartOutcome::AlreadyRunning => "Timer is already running",
                    StartOutcome::AtZero => "Time's up! Switch mode to reset the timer",
                };
                let data = ResponseData::from_timer_state(engine.state(), engine.config());
                IpcResponse::success(message, Some(data))
            }
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles the pause command.
    async fn handle_pause(&self) -> IpcResponse {
        let mut engine = self.engine.lock().await;

        match engine.pause() {
            Ok(()) => {
                let data = ResponseData::from_timer_state(engine.state(), engine.config());
                IpcResponse::success("Timer paused", Some(data))
            }
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles the switch command.
    async fn handle_switch(&self, mode: TimerMode) -> IpcResponse {
        let mut engine = self.engine.lock().await;

        match engine.switch_mode(mode) {
            Ok(()) => {
                let data = ResponseData::from_timer_state(engine.state(), engine.config());
                IpcResponse::success(format!("Switched to {}", mode.label()), Some(data))
            }
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles the configure command.
    async fn handle_configure(&self, params: ConfigureParams) -> IpcResponse {
        if params.is_empty() {
            return IpcResponse::error("No settings provided");
        }

        let mut engine = self.engine.lock().await;

        match engine.configure(&params) {
            Ok(()) => {
                let data = ResponseData::from_timer_state(engine.state(), engine.config());
                IpcResponse::success("Settings updated", Some(data))
            }
            Err(message) => IpcResponse::error(message),
        }
    }

    /// Handles the status command.
    async fn handle_status(&self) -> IpcResponse {
        let engine = self.engine.lock().await;
        let data = ResponseData::from_timer_state(engine.state(), engine.config());

        IpcResponse::success("", Some(data))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    use crate::daemon::timer::TimerEvent;
    use crate::types::TimerConfig;

    // ------------------------------------------------------------------------
    // Helper functions
    // ------------------------------------------------------------------------

    fn create_temp_socket_path() -> PathBuf {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sock");
        // Keep the directory so it's not deleted
        std::mem::forget(dir);
        path
    }

    fn create_engine() -> (
        Arc<Mutex<TimerEngine>>,
        mpsc::UnboundedReceiver<u64>,
        mpsc::UnboundedReceiver<TimerEvent>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let config = TimerConfig::default();
        let (engine, tick_rx) = TimerEngine::new(config, tx);
        (Arc::new(Mutex::new(engine)), tick_rx, rx)
    }

    // ------------------------------------------------------------------------
    // IpcServer Tests
    // ------------------------------------------------------------------------

    mod ipc_server_tests {
        use super::*;

        #[tokio::test]
        async fn test_server_creation() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path);

            assert!(server.is_ok());
            assert!(socket_path.exists());

            // Cleanup
            drop(server);
        }

        #[tokio::test]
        async fn test_server_removes_existing_socket() {
            let socket_path = create_temp_socket_path();

            // Create a dummy file at the socket path
            std::fs::write(&socket_path, "dummy").unwrap();

            // Server should remove it and bind successfully
            let server = IpcServer::new(&socket_path);
            assert!(server.is_ok());
        }

        #[tokio::test]
        async fn test_server_creates_parent_directory() {
            let dir = tempfile::tempdir().unwrap();
            let socket_path = dir.path().join("subdir").join("test.sock");

            let server = IpcServer::new(&socket_path);
            assert!(server.is_ok());
            assert!(socket_path.parent().unwrap().exists());
        }

        #[tokio::test]
        async fn test_accept_connection() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            // Connect from client in background
            let client_path = socket_path.clone();
            let client_handle = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                UnixStream::connect(&client_path).await
            });

            // Accept connection
            let stream = server.accept().await;
            assert!(stream.is_ok());

            let client_result = client_handle.await.unwrap();
            assert!(client_result.is_ok());
        }

        #[tokio::test]
        async fn test_receive_request_status() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            // Client sends status request
            let client_path = socket_path.clone();
            let client_handle = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let mut stream = UnixStream::connect(&client_path).await.unwrap();
                let request = r#"{"command":"status"}"#;
                stream.write_all(request.as_bytes()).await.unwrap();
                stream.flush().await.unwrap();
            });

            let mut stream = server.accept().await.unwrap();
            let request = IpcServer::receive_request(&mut stream).await;

            assert!(request.is_ok());
            assert!(matches!(request.unwrap(), IpcRequest::Status));

            client_handle.await.unwrap();
        }

        #[tokio::test]
        async fn test_receive_request_switch() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            let client_path = socket_path.clone();
            let client_handle = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let mut stream = UnixStream::connect(&client_path).await.unwrap();
                let request = r#"{"command":"switch","mode":"short_break"}"#;
                stream.write_all(request.as_bytes()).await.unwrap();
                stream.flush().await.unwrap();
            });

            let mut stream = server.accept().await.unwrap();
            let request = IpcServer::receive_request(&mut stream).await;

            assert!(request.is_ok());
            if let IpcRequest::Switch { mode } = request.unwrap() {
                assert_eq!(mode, TimerMode::ShortBreak);
            } else {
                panic!("Expected Switch request");
            }

            client_handle.await.unwrap();
        }

        #[tokio::test]
        async fn test_send_response() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            let client_path = socket_path.clone();
            let client_handle = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let mut stream = UnixStream::connect(&client_path).await.unwrap();

                // Read response
                let mut buffer = vec![0u8; 4096];
                let n = stream.read(&mut buffer).await.unwrap();
                let response: IpcResponse = serde_json::from_slice(&buffer[..n]).unwrap();
                response
            });

            let mut stream = server.accept().await.unwrap();
            let response = IpcResponse::success("Test message", None);
            IpcServer::send_response(&mut stream, &response)
                .await
                .unwrap();

            let received = client_handle.await.unwrap();
            assert_eq!(received.status, "success");
            assert_eq!(received.message, "Test message");
        }

        #[tokio::test]
        async fn test_receive_request_invalid_json() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            let client_path = socket_path.clone();
            let _client_handle = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let mut stream = UnixStream::connect(&client_path).await.unwrap();
                let invalid_json = "not valid json";
                stream.write_all(invalid_json.as_bytes()).await.unwrap();
                stream.flush().await.unwrap();
            });

            let mut stream = server.accept().await.unwrap();
            let request = IpcServer::receive_request(&mut stream).await;

            assert!(request.is_err());
        }

        #[tokio::test]
        async fn test_socket_path_getter() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            assert_eq!(server.socket_path(), socket_path);
        }

        #[tokio::test]
        async fn test_server_drop_cleanup() {
            let socket_path = create_temp_socket_path();

            {
                let _server = IpcServer::new(&socket_path).unwrap();
                assert!(socket_path.exists());
            }

            // Socket file should be removed after drop
            assert!(!socket_path.exists());
        }
    }

    // ------------------------------------------------------------------------
    // RequestHandler Tests
    // ------------------------------------------------------------------------

    mod request_handler_tests {
        use super::*;

        #[tokio::test]
        async fn test_handle_status() {
            let (engine, _tick_rx, _rx) = create_engine();
            let handler = RequestHandler::new(engine);

            let response = handler.handle(IpcRequest::Status).await;

            assert_eq!(response.status, "success");
            assert!(response.data.is_some());

            let data = response.data.unwrap();
            assert_eq!(data.mode, Some("work".to_string()));
            assert_eq!(data.remaining_seconds, Some(1500));
            assert_eq!(data.duration_seconds, Some(1500));
            assert_eq!(data.running, Some(false));
        }

        #[tokio::test]
        async fn test_handle_start() {
            let (engine, _tick_rx, _rx) = create_engine();
            let handler = RequestHandler::new(engine);

            let response = handler.handle(IpcRequest::Start).await;

            assert_eq!(response.status, "success");
            assert_eq!(response.message, "Timer started");

            let data = response.data.unwrap();
            assert_eq!(data.mode, Some("work".to_string()));
            assert_eq!(data.remaining_seconds, Some(1500));
            assert_eq!(data.running, Some(true));
        }

        #[tokio::test]
        async fn test_handle_start_already_running() {
            let (engine, _tick_rx, _rx) = create_engine();
            let handler = RequestHandler::new(engine.clone());

            handler.handle(IpcRequest::Start).await;
            let response = handler.handle(IpcRequest::Start).await;

            // Starting twice is a no-op, not an error.
            assert_eq!(response.status, "success");
            assert_eq!(response.message, "Timer is already running");
            assert_eq!(response.data.unwrap().running, Some(true));
        }

        #[tokio::test]
        async fn test_handle_start_at_zero() {
            let (engine, _tick_rx, _rx) = create_engine();
            let handler = RequestHandler::new(engine.clone());

            engine.lock().await.state_mut().remaining_seconds = 0;

            let response = handler.handle(IpcRequest::Start).await;

            assert_eq!(response.status, "success");
            assert!(response.message.contains("Switch mode"));
            assert_eq!(response.data.unwrap().running, Some(false));
        }

        #[tokio::test]
        async fn test_handle_pause() {
            let (engine, _tick_rx, _rx) = create_engine();
            let handler = RequestHandler::new(engine);

            handler.handle(IpcRequest::Start).await;
            let response = handler.handle(IpcRequest::Pause).await;

            assert_eq!(response.status, "success");
            assert_eq!(response.message, "Timer paused");
            assert_eq!(response.data.unwrap().running, Some(false));
        }

        #[tokio::test]
        async fn test_handle_pause_when_idle() {
            let (engine, _tick_rx, _rx) = create_engine();
            let handler = RequestHandler::new(engine);

            let response = handler.handle(IpcRequest::Pause).await;

            // Pause is idempotent.
            assert_eq!(response.status, "success");
            assert_eq!(response.data.unwrap().running, Some(false));
        }

        #[tokio::test]
        async fn test_handle_switch() {
            let (engine, _tick_rx, _rx) = create_engine();
            let handler = RequestHandler::new(engine);

            let response = handler
                .handle(IpcRequest::Switch {
                    mode: TimerMode::LongBreak,
                })
                .await;

            assert_eq!(response.status, "success");
            assert_eq!(response.message, "Switched to Long Break");

            let data = response.data.unwrap();
            assert_eq!(data.mode, Some("long_break".to_string()));
            assert_eq!(data.remaining_seconds, Some(900));
            assert_eq!(data.running, Some(false));
        }

        #[tokio::test]
        async fn test_handle_switch_while_running() {
            let (engine, _tick_rx, _rx) = create_engine();
            let handler = RequestHandler::new(engine);

            handler.handle(IpcRequest::Start).await;
            let response = handler
                .handle(IpcRequest::Switch {
                    mode: TimerMode::ShortBreak,
                })
                .await;

            assert_eq!(response.status, "success");
            let data = response.data.unwrap();
            assert_eq!(data.remaining_seconds, Some(300));
            assert_eq!(data.running, Some(false));
        }

        #[tokio::test]
        async fn test_handle_configure() {
            let (engine, _tick_rx, _rx) = create_engine();
            let handler = RequestHandler::new(engine.clone());

            let response = handler
                .handle(IpcRequest::Configure {
                    params: ConfigureParams {
                        work_minutes: Some(50),
                        ..Default::default()
                    },
                })
                .await;

            assert_eq!(response.status, "success");
            assert_eq!(response.message, "Settings updated");
            assert_eq!(engine.lock().await.config().work_minutes, 50);
        }

        #[tokio::test]
        async fn test_handle_configure_invalid() {
            let (engine, _tick_rx, _rx) = create_engine();
            let handler = RequestHandler::new(engine);

            let response = handler
                .handle(IpcRequest::Configure {
                    params: ConfigureParams {
                        short_break_minutes: Some(31),
                        ..Default::default()
                    },
                })
                .await;

            assert_eq!(response.status, "error");
            assert!(response.message.contains("between 1 and 30"));
        }

        #[tokio::test]
        async fn test_handle_configure_empty() {
            let (engine, _tick_rx, _rx) = create_engine();
            let handler = RequestHandler::new(engine);

            let response = handler
                .handle(IpcRequest::Configure {
                    params: ConfigureParams::default(),
                })
                .await;

            assert_eq!(response.status, "error");
            assert!(response.message.contains("No settings"));
        }
    }

    // ------------------------------------------------------------------------
    // Integration Tests
    // ------------------------------------------------------------------------

    mod integration_tests {
        use super::*;

        #[tokio::test]
        async fn test_full_ipc_flow() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();
            let (engine, _tick_rx, _rx) = create_engine();
            let handler = RequestHandler::new(engine);

            // Client sends start request
            let client_path = socket_path.clone();
            let client_handle = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let mut stream = UnixStream::connect(&client_path).await.unwrap();

                // Send start request
                let request = r#"{"command":"start"}"#;
                stream.write_all(request.as_bytes()).await.unwrap();
                stream.flush().await.unwrap();

                // Read response
                let mut buffer = vec![0u8; 4096];
                let n = stream.read(&mut buffer).await.unwrap();
                let response: IpcResponse = serde_json::from_slice(&buffer[..n]).unwrap();
                response
            });

            // Server handles request
            let mut stream = server.accept().await.unwrap();
            let request = IpcServer::receive_request(&mut stream).await.unwrap();
            let response = handler.handle(request).await;
            IpcServer::send_response(&mut stream, &response)
                .await
                .unwrap();

            // Verify client received correct response
            let client_response = client_handle.await.unwrap();
            assert_eq!(client_response.status, "success");
            assert_eq!(client_response.message, "Timer started");

            let data = client_response.data.unwrap();
            assert_eq!(data.mode, Some("work".to_string()));
            assert_eq!(data.remaining_seconds, Some(1500));
        }

        #[tokio::test]
        async fn test_all_commands_flow() {
            let (engine, _tick_rx, _rx) = create_engine();
            let handler = RequestHandler::new(engine);

            // Simulate command sequence: start -> pause -> start -> switch -> status
            let commands = vec![
                (r#"{"command":"start"}"#, Some(true)),
                (r#"{"command":"pause"}"#, Some(false)),
                (r#"{"command":"start"}"#, Some(true)),
                (r#"{"command":"switch","mode":"short_break"}"#, Some(false)),
                (r#"{"command":"status"}"#, Some(false)),
            ];

            for (cmd_json, expected_running) in commands {
                let request: IpcRequest = serde_json::from_str(cmd_json).unwrap();
                let response = handler.handle(request).await;

                assert_eq!(response.status, "success", "Command: {}", cmd_json);
                let data = response.data.expect("Response should contain data");
                assert_eq!(data.running, expected_running, "Command: {}", cmd_json);
            }
        }

        #[tokio::test]
        async fn test_pause_resume_preserves_remaining_over_ipc() {
            let (engine, _tick_rx, _rx) = create_engine();
            let handler = RequestHandler::new(engine.clone());

            handler.handle(IpcRequest::Start).await;
            engine.lock().await.state_mut().remaining_seconds = 1111;

            let response = handler.handle(IpcRequest::Pause).await;
            assert_eq!(response.data.unwrap().remaining_seconds, Some(1111));

            let response = handler.handle(IpcRequest::Start).await;
            assert_eq!(response.data.unwrap().remaining_seconds, Some(1111));
        }
    }

    // ------------------------------------------------------------------------
    // Error Handling Tests
    // ------------------------------------------------------------------------

    mod error_tests {
        use super::*;

        #[tokio::test]
        async fn test_connection_closed() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            let client_path = socket_path.clone();
            let _client = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let stream = UnixStream::connect(&client_path).await.unwrap();
                // Close immediately without sending anything
                drop(stream);
            });

            let mut stream = server.accept().await.unwrap();
            let result = IpcServer::receive_request(&mut stream).await;

            assert!(result.is_err());
        }

        #[tokio::test]
        async fn test_ipc_error_display() {
            let err = IpcError::BindError("test error".to_string());
            assert_eq!(err.to_string(), "Failed to bind socket: test error");

            let err = IpcError::Timeout;
            assert_eq!(err.to_string(), "Operation timed out");

            let err = IpcError::RequestTooLarge;
            assert!(err.to_string().contains("4096"));
        }
    }
}
