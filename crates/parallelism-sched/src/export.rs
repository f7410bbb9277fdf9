//! Graphviz export of block dependency graphs

use std::fmt::Write as _;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::graph::DependencyGraph;
use crate::SchedError;

/// Quote a DOT identifier
fn quote(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            _ => result.push(c),
        }
    }
    result.push('"');
    result
}

/// Render `graph` as a DOT digraph
///
/// Node lines come in label order, edge lines in discovery order, so equal
/// graphs always produce identical text.
pub fn render_dot(name: &str, graph: &DependencyGraph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph {} {{", quote(name));
    for node in &graph.nodes {
        let _ = writeln!(out, "    {};", quote(&node.label));
    }
    for edge in &graph.edges {
        if let (Some(p), Some(c)) = (graph.label_of(edge.producer), graph.label_of(edge.consumer)) {
            let _ = writeln!(out, "    {} -> {};", quote(p), quote(c));
        }
    }
    out.push_str("}\n");
    out
}

/// Keep a function name usable as a directory name
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `<root>/<function>`: the directory holding a function's graphs
pub fn function_dir(root: &Path, function: &str) -> PathBuf {
    root.join(sanitize(function))
}

/// Temporary file in `dir` that becomes world-readable once persisted
///
/// A plain `NamedTempFile` is created owner-only, and the rename would carry
/// that mode over to the graph.
fn graph_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".bb").suffix(".dot.tmp");
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(Permissions::from_mode(0o644));
    }
    builder.tempfile_in(dir)
}

/// `<root>/<function>/bb<index>.dot`
pub fn graph_path(root: &Path, function: &str, index: usize) -> PathBuf {
    function_dir(root, function).join(format!("bb{}.dot", index))
}

/// Write the rendered graph to `path`, replacing any existing file
///
/// The text goes to a temporary file next to `path` first and is renamed
/// into place, so a failed write never leaves a truncated graph behind.
/// The parent directory must already exist.
pub fn export_graph(name: &str, graph: &DependencyGraph, path: &Path) -> Result<(), SchedError> {
    let text = render_dot(name, graph);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = graph_temp_file(dir).map_err(|e| SchedError::export(path, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| SchedError::export(path, e))?;
    file.persist(path)
        .map_err(|e| SchedError::export(path, e.error))?;

    log::debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DependencyEdge, GraphNode};
    use parallelism_ir::InstId;
    use std::fs;
    use tempfile::tempdir;

    fn diamond() -> DependencyGraph {
        DependencyGraph {
            nodes: vec![
                GraphNode { inst: InstId(0), label: "add1".into() },
                GraphNode { inst: InstId(1), label: "sub2".into() },
                GraphNode { inst: InstId(2), label: "add3".into() },
            ],
            edges: vec![
                DependencyEdge { producer: InstId(0), consumer: InstId(2) },
                DependencyEdge { producer: InstId(1), consumer: InstId(2) },
            ],
        }
    }

    #[test]
    fn test_render_dot() {
        let expected = "digraph \"f.entry\" {\n    \"add1\";\n    \"sub2\";\n    \"add3\";\n    \"add1\" -> \"add3\";\n    \"sub2\" -> \"add3\";\n}\n";
        assert_eq!(render_dot("f.entry", &diamond()), expected);
    }

    #[test]
    fn test_render_empty_graph() {
        assert_eq!(render_dot("g", &DependencyGraph::default()), "digraph \"g\" {\n}\n");
    }

    #[test]
    fn test_quotes_are_escaped() {
        let graph = DependencyGraph {
            nodes: vec![GraphNode { inst: InstId(0), label: "odd\"op1".into() }],
            edges: vec![],
        };
        assert!(render_dot("g", &graph).contains("    \"odd\\\"op1\";\n"));
    }

    #[test]
    fn test_graph_path() {
        let path = graph_path(Path::new("out"), "main", 3);
        assert_eq!(path, Path::new("out").join("main").join("bb3.dot"));

        let odd = graph_path(Path::new("out"), "ns::fn<T>", 0);
        assert_eq!(odd, Path::new("out").join("ns__fn_T_").join("bb0.dot"));
    }

    #[test]
    fn test_export_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bb0.dot");
        fs::write(&path, "stale contents that are much longer than the graph").unwrap();

        export_graph("f.entry", &diamond(), &path).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        assert_eq!(first, render_dot("f.entry", &diamond()));

        export_graph("f.entry", &diamond(), &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), first.as_bytes());
    }

    #[cfg(unix)]
    #[test]
    fn test_export_keeps_regular_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("bb0.dot");
        // Same mode an ordinary write gets under the current umask
        let reference = dir.path().join("reference");
        fs::write(&reference, "").unwrap();
        let expected = fs::metadata(&reference).unwrap().permissions().mode() & 0o777;

        export_graph("f.entry", &diamond(), &path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, expected);

        // Overwriting an existing graph leaves its readers able to read it
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        export_graph("f.entry", &diamond(), &path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, expected);
    }

    #[test]
    fn test_export_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("bb0.dot");
        let err = export_graph("f.entry", &diamond(), &path).unwrap_err();
        assert_eq!(err.code(), "E-SCHED-003");
        assert!(!path.exists());
        // No stray temporary files either
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
