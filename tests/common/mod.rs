#![allow(dead_code)]

use async_trait::async_trait;
use codemap_bridge::bridge::EngineLocator;
use codemap_bridge::core::{
    AnalysisResult, BridgeResult, CodeGraph, EdgeType, EngineInvocation, EngineProcess, GraphEdge,
    GraphNode, NodeType, ProcessOutput,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Shared test utilities to reduce duplication across test files
pub mod test_helpers {
    use super::*;

    /// Engine JSON for a small class/method graph targeted at `target`.
    pub fn engine_response(command: &str, target: &str) -> String {
        json!({
            "command": command,
            "target": target,
            "timestamp": "2024-05-01T08:00:00Z",
            "analysisTimeMs": 42,
            "stats": {
                "totalClassesParsed": 1,
                "totalMethodsParsed": 1,
                "graphNodes": 2,
                "graphEdges": 1
            },
            "graph": {
                "nodes": [
                    {"id": format!("{target}#class"), "name": target, "type": "CLASS"},
                    {"id": format!("{target}#run"), "name": "run", "type": "METHOD",
                     "filePath": "/src/Job.java", "lineNumber": 12, "metadata": null}
                ],
                "edges": [
                    {"id": "e1", "source": format!("{target}#class"),
                     "target": format!("{target}#run"), "type": "CONTAINS"}
                ]
            }
        })
        .to_string()
    }

    /// `{A: Class, B: Method(/x.java:12)}` with `A -CONTAINS-> B`.
    pub fn class_and_method() -> AnalysisResult {
        let graph = CodeGraph::new(
            vec![
                GraphNode::new("A", "A", NodeType::Class),
                GraphNode::new("B", "b", NodeType::Method).with_location("/x.java", 12),
            ],
            vec![GraphEdge::new("e1", "A", "B", EdgeType::Contains)],
        )
        .unwrap();
        AnalysisResult::new("callgraph", graph)
    }

    /// Value of the `--target` argument in an invocation.
    pub fn target_of(invocation: &EngineInvocation) -> Option<String> {
        invocation
            .args
            .iter()
            .position(|a| a == "--target")
            .and_then(|i| invocation.args.get(i + 1))
            .map(|a| a.to_string_lossy().into_owned())
    }
}

/// Scratch project with an engine jar and a JDK home whose `bin/java` is a
/// shell script replaying canned output.
pub struct FakeEngine {
    pub dir: TempDir,
    pub project: PathBuf,
    pub jar: PathBuf,
    pub java_home: PathBuf,
}

impl FakeEngine {
    #[cfg(unix)]
    pub fn new() -> Self {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let project = dir.path().join("project");
        fs::create_dir_all(project.join("src/main/java")).unwrap();

        let jar = dir.path().join("codemap-core.jar");
        fs::write(&jar, b"not really a jar").unwrap();

        let java_home = dir.path().join("jdk");
        let bin = java_home.join("bin");
        fs::create_dir_all(&bin).unwrap();
        let script = bin.join("java");
        fs::write(
            &script,
            "#!/bin/sh\n\
             here=\"$(dirname \"$0\")\"\n\
             printf '%s\\n' \"$@\" > \"$here/args.txt\"\n\
             pwd > \"$here/cwd.txt\"\n\
             cat \"$here/stdout.txt\"\n\
             cat \"$here/stderr.txt\" >&2\n\
             exit \"$(cat \"$here/code.txt\")\"\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let engine = Self {
            dir,
            project,
            jar,
            java_home,
        };
        engine.respond("", "", 0);
        engine
    }

    /// What the next run prints and how it exits.
    pub fn respond(&self, stdout: &str, stderr: &str, code: i32) {
        let bin = self.java_home.join("bin");
        fs::write(bin.join("stdout.txt"), stdout).unwrap();
        fs::write(bin.join("stderr.txt"), stderr).unwrap();
        fs::write(bin.join("code.txt"), code.to_string()).unwrap();
    }

    pub fn locator(&self) -> EngineLocator {
        EngineLocator::new(&self.project)
            .with_core_jar(Some(self.jar.clone()))
            .with_java_home(Some(self.java_home.clone()))
            .with_java_home_env(None)
            .with_home_dir(None)
    }

    pub fn source_root(&self) -> PathBuf {
        self.project.join("src/main/java")
    }

    /// Arguments the script saw on its last run, one per line.
    pub fn recorded_args(&self) -> Vec<String> {
        fs::read_to_string(self.java_home.join("bin/args.txt"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn recorded_cwd(&self) -> PathBuf {
        let cwd = fs::read_to_string(self.java_home.join("bin/cwd.txt")).unwrap_or_default();
        PathBuf::from(cwd.trim_end())
    }
}

/// In-process engine that answers per target after a per-target delay, so
/// tests can make queries finish out of order.
#[derive(Debug, Clone, Default)]
pub struct DelayedEngine {
    delays: Vec<(String, Duration)>,
    failures: Vec<(String, i32, String)>,
}

impl DelayedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, target: &str, delay: Duration) -> Self {
        self.delays.push((target.to_string(), delay));
        self
    }

    pub fn failing(mut self, target: &str, code: i32, stderr: &str) -> Self {
        self.failures.push((target.to_string(), code, stderr.to_string()));
        self
    }
}

#[async_trait]
impl EngineProcess for DelayedEngine {
    async fn run(&self, invocation: &EngineInvocation) -> BridgeResult<ProcessOutput> {
        let target = test_helpers::target_of(invocation).unwrap_or_default();
        if let Some((_, delay)) = self.delays.iter().find(|(t, _)| *t == target) {
            tokio::time::sleep(*delay).await;
        }

        if let Some((_, code, stderr)) = self.failures.iter().find(|(t, _, _)| *t == target) {
            return Ok(ProcessOutput {
                exit_code: Some(*code),
                stdout: Vec::new(),
                stderr: stderr.clone().into_bytes(),
            });
        }

        Ok(ProcessOutput {
            exit_code: Some(0),
            stdout: test_helpers::engine_response("dependencies", &target).into_bytes(),
            stderr: Vec::new(),
        })
    }
}

/// Project dir plus a locator whose jar and java both exist (never executed).
pub fn resolvable_project() -> (TempDir, EngineLocator) {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("codemap-core.jar");
    fs::write(&jar, b"jar").unwrap();
    let java = dir.path().join("jdk/bin").join(if cfg!(windows) { "java.exe" } else { "java" });
    fs::create_dir_all(java.parent().unwrap()).unwrap();
    fs::write(&java, b"").unwrap();

    let locator = EngineLocator::new(dir.path())
        .with_core_jar(Some(jar))
        .with_java_home(Some(dir.path().join("jdk")));
    (dir, locator)
}

pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}
