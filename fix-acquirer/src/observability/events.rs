//! Canonical structured event names used across `fix-acquirer`.

// Admission events.
pub const REQUEST_RECEIVED: &str = "request_received";
pub const REQUEST_REJECTED: &str = "request_rejected";
pub const PROVIDER_SELECTED: &str = "provider_selected";

// Gateway subscription events.
pub const LISTENER_SUBSCRIBE_OK: &str = "listener_subscribe_ok";
pub const LISTENER_SUBSCRIBE_FAILED: &str = "listener_subscribe_failed";
pub const LISTENER_UNSUBSCRIBE_OK: &str = "listener_unsubscribe_ok";
pub const LISTENER_UNSUBSCRIBE_FAILED: &str = "listener_unsubscribe_failed";

// Provider callback events.
pub const CALLBACK_RECEIVED: &str = "callback_received";
pub const CALLBACK_ENQUEUE_FAILED: &str = "callback_enqueue_failed";
pub const CALLBACK_STALE: &str = "callback_stale";
pub const CALLBACK_IGNORED: &str = "callback_ignored";
pub const LISTENER_TERMINAL: &str = "listener_terminal";

// Reply channel events.
pub const REPLY_SEND_OK: &str = "reply_send_ok";
pub const REPLY_SEND_FAILED: &str = "reply_send_failed";
pub const REPLY_DROPPED: &str = "reply_dropped";

// Service lifecycle events.
pub const SERVICE_START: &str = "service_start";
pub const SERVICE_SHUTDOWN: &str = "service_shutdown";
pub const SERVICE_DROPPED: &str = "service_dropped";

// Dispatcher lifecycle events.
pub const DISPATCHER_START: &str = "dispatcher_start";
pub const DISPATCHER_STOP: &str = "dispatcher_stop";
pub const COMMANDS_DROPPED: &str = "commands_dropped";
pub const TEARDOWN_START: &str = "teardown_start";
pub const TEARDOWN_DONE: &str = "teardown_done";

// Runtime events.
pub const RUNTIME_SPAWN_OK: &str = "runtime_spawn_ok";
pub const RUNTIME_SPAWN_FAILED: &str = "runtime_spawn_failed";
pub const RUNTIME_JOIN_FAILED: &str = "runtime_join_failed";
