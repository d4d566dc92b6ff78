//! Request dispatch for host bridges that call the module by method name
//!
//! A bridge receives `{ "method": "addListener", "args": ["AUDIO_CHANGE"] }`
//! style requests and needs a promise-like answer. The six module commands
//! always resolve; only malformed requests are rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, Result};
use crate::module::BluetoothClassicModule;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HostRequest {
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl HostRequest {
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CommandResponse {
    Resolved { value: Value },
    Rejected { code: String, message: String },
}

impl CommandResponse {
    fn resolved(value: impl Into<Value>) -> Self {
        CommandResponse::Resolved {
            value: value.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, CommandResponse::Resolved { .. })
    }
}

impl From<BridgeError> for CommandResponse {
    fn from(err: BridgeError) -> Self {
        CommandResponse::Rejected {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Commands exposed at the module boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleCommand {
    IsBluetoothEnabled,
    GetCurrentRoute,
    SendLyrics(String),
    AddListener(String),
    RemoveListener(String),
    RemoveAllListeners(String),
    SupportedEvents,
}

impl ModuleCommand {
    pub fn parse(request: &HostRequest) -> Result<Self> {
        let method = request.method.as_str();
        let command = match method {
            "isBluetoothEnabled" => ModuleCommand::IsBluetoothEnabled,
            "getCurrentRoute" => ModuleCommand::GetCurrentRoute,
            "supportedEvents" => ModuleCommand::SupportedEvents,
            "sendLyrics" => ModuleCommand::SendLyrics(string_arg(request)?),
            "addListener" => ModuleCommand::AddListener(string_arg(request)?),
            "removeListener" => ModuleCommand::RemoveListener(string_arg(request)?),
            "removeAllListeners" => ModuleCommand::RemoveAllListeners(string_arg(request)?),
            _ => return Err(BridgeError::UnknownCommand(method.to_string())),
        };
        Ok(command)
    }
}

fn string_arg(request: &HostRequest) -> Result<String> {
    match request.args.first() {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(BridgeError::InvalidArgument {
            method: request.method.clone(),
            reason: format!("expected a string, got {}", other),
        }),
        None => Err(BridgeError::InvalidArgument {
            method: request.method.clone(),
            reason: "missing argument".to_string(),
        }),
    }
}

impl BluetoothClassicModule {
    /// Run one host request and produce its response
    pub fn dispatch(&self, request: &HostRequest) -> CommandResponse {
        let command = match ModuleCommand::parse(request) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!("Rejected host request: {}", e);
                return e.into();
            }
        };

        tracing::trace!("Dispatching {:?}", command);

        match command {
            ModuleCommand::IsBluetoothEnabled => {
                CommandResponse::resolved(self.is_bluetooth_enabled())
            }
            ModuleCommand::GetCurrentRoute => {
                match serde_json::to_value(self.get_current_route()) {
                    Ok(route) => CommandResponse::resolved(route),
                    Err(e) => BridgeError::from(e).into(),
                }
            }
            ModuleCommand::SupportedEvents => {
                CommandResponse::resolved(self.supported_events())
            }
            ModuleCommand::SendLyrics(text) => {
                self.send_lyrics(&text);
                CommandResponse::resolved(Value::Null)
            }
            ModuleCommand::AddListener(name) => {
                self.add_listener(&name);
                CommandResponse::resolved(Value::Null)
            }
            ModuleCommand::RemoveListener(name) => {
                self.remove_listener(&name);
                CommandResponse::resolved(Value::Null)
            }
            ModuleCommand::RemoveAllListeners(name) => {
                self.remove_all_listeners(&name);
                CommandResponse::resolved(Value::Null)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("isBluetoothEnabled", vec![], ModuleCommand::IsBluetoothEnabled)]
    #[case("getCurrentRoute", vec![], ModuleCommand::GetCurrentRoute)]
    #[case("supportedEvents", vec![], ModuleCommand::SupportedEvents)]
    #[case("sendLyrics", vec![json!("hello")], ModuleCommand::SendLyrics("hello".into()))]
    #[case(
        "addListener",
        vec![json!("AUDIO_CHANGE")],
        ModuleCommand::AddListener("AUDIO_CHANGE".into())
    )]
    #[case(
        "removeListener",
        vec![json!("AUDIO_CHANGE@d")],
        ModuleCommand::RemoveListener("AUDIO_CHANGE@d".into())
    )]
    #[case("removeAllListeners", vec![json!("X")], ModuleCommand::RemoveAllListeners("X".into()))]
    fn test_parse(#[case] method: &str, #[case] args: Vec<Value>, #[case] expected: ModuleCommand) {
        let command = ModuleCommand::parse(&HostRequest::new(method, args)).unwrap();
        assert_eq!(command, expected);
    }

    #[test]
    fn test_unknown_method() {
        let err = ModuleCommand::parse(&HostRequest::new("connectToDevice", vec![])).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_COMMAND");
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![json!(42)])]
    #[case(vec![Value::Null])]
    fn test_bad_string_argument(#[case] args: Vec<Value>) {
        let err = ModuleCommand::parse(&HostRequest::new("addListener", args)).unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_request_deserializes_without_args() {
        let request: HostRequest =
            serde_json::from_str(r#"{ "method": "isBluetoothEnabled" }"#).unwrap();
        assert!(request.args.is_empty());
    }

    #[test]
    fn test_response_wire_shape() {
        let resolved = serde_json::to_value(CommandResponse::resolved(true)).unwrap();
        assert_eq!(resolved, json!({ "status": "resolved", "value": true }));

        let rejected: CommandResponse = BridgeError::UnknownCommand("nope".into()).into();
        let rejected = serde_json::to_value(rejected).unwrap();
        assert_eq!(rejected["status"], "rejected");
        assert_eq!(rejected["code"], "UNKNOWN_COMMAND");
    }
}
