//! Strict decoding of engine stdout into an [`AnalysisResult`].

use crate::core::{AnalysisDocument, AnalysisResult, BridgeError, BridgeResult};
use tracing::warn;

/// Parse one engine response.
///
/// The body must be exactly one JSON document matching the wire schema;
/// unknown node/edge types and missing required fields are rejected rather
/// than coerced. Graph integrity is checked after the schema.
pub fn decode_analysis_result(stdout: &[u8]) -> BridgeResult<AnalysisResult> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Err(BridgeError::Decode {
            message: "engine exited successfully but wrote nothing to stdout".to_string(),
            source: None,
        });
    }

    let document: AnalysisDocument = serde_json::from_slice(stdout)
        .map_err(|e| BridgeError::decode("stdout is not a valid AnalysisResult document", e))?;

    let result = AnalysisResult::try_from(document)?;

    if let Some(((nodes, edges), (actual_nodes, actual_edges))) = result.stats_mismatch() {
        warn!(
            "Engine stats report {} nodes / {} edges but the graph has {} / {}",
            nodes, edges, actual_nodes, actual_edges
        );
    }

    Ok(result)
}
