//! The depth-estimation service boundary, transport-free.
//!
//! `POST /depth-map` takes `{ images: string[] }` and answers one result per
//! URL, order-preserving. Until a real estimation model sits behind it,
//! every `depthMap` is `null`, which downstream consumers must treat as
//! "depth weight 0" (flat, non-reactive) for the affected layer.

use crate::error::{DriftError, DriftResult};

pub const BAD_REQUEST_MSG: &str = "images must be a non-empty array";

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DepthMapRequest {
    pub images: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DepthMapResponse {
    pub results: Vec<DepthMapEntry>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DepthMapEntry {
    pub url: String,
    /// `None` means not yet available, serialized as an explicit `null`.
    #[serde(rename = "depthMap")]
    pub depth_map: Option<String>,
}

/// Status plus JSON body, ready for whatever transport fronts this.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceReply {
    pub status: u16,
    pub body: serde_json::Value,
}

/// Typed core of the endpoint.
pub fn estimate_depth_maps(req: &DepthMapRequest) -> DriftResult<DepthMapResponse> {
    if req.images.is_empty() {
        return Err(DriftError::validation(BAD_REQUEST_MSG));
    }
    // Placeholder until model inference is wired in: null per URL.
    let results = req
        .images
        .iter()
        .map(|url| DepthMapEntry {
            url: url.clone(),
            depth_map: None,
        })
        .collect();
    Ok(DepthMapResponse { results })
}

/// Handle one raw request body. Anything that does not parse as
/// `{ images: [non-empty array of strings] }` is a 400 with the canonical
/// error message; this never panics.
pub fn handle_depth_map(body: &str) -> ServiceReply {
    let Ok(req) = serde_json::from_str::<DepthMapRequest>(body) else {
        return bad_request();
    };
    match estimate_depth_maps(&req) {
        Ok(resp) => match serde_json::to_value(&resp) {
            Ok(body) => ServiceReply { status: 200, body },
            // Unreachable for a response of plain strings and nulls, but a
            // serializer failure is the server's fault, not the client's.
            Err(err) => ServiceReply {
                status: 500,
                body: serde_json::json!({ "error": err.to_string() }),
            },
        },
        Err(_) => bad_request(),
    }
}

fn bad_request() -> ServiceReply {
    ServiceReply {
        status: 400,
        body: serde_json::json!({ "error": BAD_REQUEST_MSG }),
    }
}
