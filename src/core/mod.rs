pub mod constants;
pub mod errors;
pub mod graph;
pub mod traits;
pub mod types;

pub use errors::{BridgeError, BridgeResult, EngineComponent, GraphIntegrityError};
pub use graph::CodeGraph;
pub use traits::{EngineInvocation, EngineProcess, HostUi, ProcessOutput};
pub use types::{
    AnalysisDocument, AnalysisResult, AnalysisStats, EdgeType, EngineCommand, GraphDocument,
    GraphEdge, GraphNode, Metadata, NavigationIntent, NodeType,
};
