//! Window message protocol between the host page and the embedded app.
//!
//! Every message is `{ "action": <name>, "data": <payload> }`. Inbound
//! messages are decoded from untyped JSON here, before the controller sees
//! them; outbound messages serialize through serde.

use serde::Serialize;
use serde_json::Value;

use crate::error::ProtocolError;

pub const ACTION_MINIMIZE: &str = "minimize";
pub const ACTION_OPEN_LINK: &str = "openLink";
pub const ACTION_INITIALIZED: &str = "initialized";
pub const ACTION_CLEAR_QUERY_PARAMS: &str = "clearQueryParams";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    Minimize,
    OpenLink(OpenLinkRequest),
    Initialized,
    ClearQueryParams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenLinkRequest {
    pub href: String,
    /// Anything other than an explicit `false` opens a new tab.
    pub is_external: bool,
}

impl InboundMessage {
    pub fn decode(message: &Value) -> Result<Self, ProtocolError> {
        let action = message
            .get("action")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingAction)?;
        match action {
            ACTION_MINIMIZE => Ok(Self::Minimize),
            ACTION_INITIALIZED => Ok(Self::Initialized),
            ACTION_CLEAR_QUERY_PARAMS => Ok(Self::ClearQueryParams),
            ACTION_OPEN_LINK => decode_open_link(message.get("data")).map(Self::OpenLink),
            other => Err(ProtocolError::UnknownAction(other.to_string())),
        }
    }
}

fn decode_open_link(data: Option<&Value>) -> Result<OpenLinkRequest, ProtocolError> {
    let data = data.ok_or(ProtocolError::MissingHref)?;
    let href = data
        .get("href")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .ok_or(ProtocolError::MissingHref)?;
    let is_external = data.get("isExternal") != Some(&Value::Bool(false));
    Ok(OpenLinkRequest {
        href: href.to_string(),
        is_external,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "data", rename_all = "camelCase")]
pub enum OutboundMessage {
    RelayMinimized(bool),
    WindowLocation(String),
    SetRelayUsername { username: String },
}

impl OutboundMessage {
    #[must_use]
    pub fn to_json(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(value) => value,
            Err(error) => {
                tracing::error!(%error, "failed to encode outbound message");
                Value::Null
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_unit_actions() {
        assert_eq!(
            InboundMessage::decode(&json!({"action": "minimize"})),
            Ok(InboundMessage::Minimize)
        );
        assert_eq!(
            InboundMessage::decode(&json!({"action": "initialized", "data": null})),
            Ok(InboundMessage::Initialized)
        );
        assert_eq!(
            InboundMessage::decode(&json!({"action": "clearQueryParams"})),
            Ok(InboundMessage::ClearQueryParams)
        );
    }

    #[test]
    fn open_link_defaults_to_external() {
        let decoded = InboundMessage::decode(&json!({
            "action": "openLink",
            "data": {"href": "https://docs.example.com"}
        }));
        assert_eq!(
            decoded,
            Ok(InboundMessage::OpenLink(OpenLinkRequest {
                href: "https://docs.example.com".to_string(),
                is_external: true,
            }))
        );
    }

    #[test]
    fn open_link_only_explicit_false_is_internal() {
        let internal = InboundMessage::decode(&json!({
            "action": "openLink",
            "data": {"href": "/pricing", "isExternal": false}
        }));
        assert!(matches!(
            internal,
            Ok(InboundMessage::OpenLink(OpenLinkRequest { is_external: false, .. }))
        ));

        let truthy_string = InboundMessage::decode(&json!({
            "action": "openLink",
            "data": {"href": "/pricing", "isExternal": "no"}
        }));
        assert!(matches!(
            truthy_string,
            Ok(InboundMessage::OpenLink(OpenLinkRequest { is_external: true, .. }))
        ));
    }

    #[test]
    fn open_link_without_href_is_rejected() {
        for message in [
            json!({"action": "openLink"}),
            json!({"action": "openLink", "data": {}}),
            json!({"action": "openLink", "data": {"href": ""}}),
            json!({"action": "openLink", "data": {"href": 7}}),
        ] {
            assert_eq!(
                InboundMessage::decode(&message),
                Err(ProtocolError::MissingHref)
            );
        }
    }

    #[test]
    fn rejects_missing_and_unknown_actions() {
        assert_eq!(
            InboundMessage::decode(&json!("minimize")),
            Err(ProtocolError::MissingAction)
        );
        assert_eq!(
            InboundMessage::decode(&json!({"action": 3})),
            Err(ProtocolError::MissingAction)
        );
        assert_eq!(
            InboundMessage::decode(&json!({"action": "selfDestruct"})),
            Err(ProtocolError::UnknownAction("selfDestruct".to_string()))
        );
    }

    #[test]
    fn outbound_messages_use_action_and_data() {
        assert_eq!(
            OutboundMessage::RelayMinimized(false).to_json(),
            json!({"action": "relayMinimized", "data": false})
        );
        assert_eq!(
            OutboundMessage::WindowLocation("https://a.example/".to_string()).to_json(),
            json!({"action": "windowLocation", "data": "https://a.example/"})
        );
        assert_eq!(
            OutboundMessage::SetRelayUsername {
                username: "ada".to_string()
            }
            .to_json(),
            json!({"action": "setRelayUsername", "data": {"username": "ada"}})
        );
    }
}
