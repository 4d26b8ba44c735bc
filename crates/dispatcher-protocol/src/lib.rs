//! Extension message protocol.
//!
//! Requests are JSON objects tagged by `action`. Responses always carry
//! `success` plus the fields of the answered action.

mod protocol;

pub use protocol::{
    parse_request, parse_request_str, ExtensionRequest, ExtensionResponse, ProtocolError,
    SUPPORTED_ACTIONS, UNSAFE_URL_REASON,
};
