//! Error adapter for converting RelaymapError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Each error variant
//! gets a stable diagnostic code and, where the fix is predictable, a help line.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use relaymap::{GraphError, RelaymapError};

/// Adapter rendering a [`RelaymapError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a RelaymapError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            RelaymapError::Io(_) => "relaymap::io",
            RelaymapError::Json(_) => "relaymap::json",
            RelaymapError::Config(_) => "relaymap::config",
            RelaymapError::Graph(err) => match err {
                GraphError::UnknownNodeReference { .. } => "relaymap::graph::unknown_node",
                GraphError::DuplicateNodeId(_) => "relaymap::graph::duplicate_node",
                GraphError::InvalidConfiguration { .. } => "relaymap::graph::invalid_config",
                GraphError::InvalidLinkWeight { .. } => "relaymap::graph::invalid_weight",
                GraphError::MismatchedPosition { .. } => "relaymap::graph::mismatched_position",
                GraphError::InvalidPosition { .. } => "relaymap::graph::invalid_position",
                GraphError::InvalidDegree { .. } => "relaymap::graph::invalid_degree",
            },
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            RelaymapError::Io(_) => return None,
            RelaymapError::Json(_) => {
                "a graph document is an object with `nodes` and `links` arrays; \
                 roles are `guard`, `middle`, or `exit`"
            }
            RelaymapError::Config(_) => {
                "check the file given with --config, relaymap/config.toml, \
                 or the platform configuration directory"
            }
            RelaymapError::Graph(err) => match err {
                GraphError::UnknownNodeReference { .. } => {
                    "every link `source` and `target` must name the `id` of a node in the same document"
                }
                GraphError::DuplicateNodeId(_) => "node ids must be unique within one graph",
                GraphError::InvalidConfiguration { .. } => {
                    "adjust the named field in the [layout] table of the configuration"
                }
                GraphError::InvalidLinkWeight { .. } => {
                    "omit `weight` for the default of 1.0, or give a finite non-negative number"
                }
                GraphError::MismatchedPosition { .. } => {
                    "give both `x` and `y` to place a node, or neither to place it from the seed"
                }
                GraphError::InvalidPosition { .. } => {
                    "`x` and `y` must be finite numbers; omit both to place the node from the seed"
                }
                GraphError::InvalidDegree { .. } => {
                    "omit `degree` to count links, or give a finite non-negative number"
                }
            },
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Convert a [`RelaymapError`] into something miette can render.
pub fn to_reportable(err: &RelaymapError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(err: &RelaymapError) -> String {
        to_reportable(err).code().unwrap().to_string()
    }

    #[test]
    fn test_graph_errors_have_specific_codes() {
        let err = RelaymapError::Graph(GraphError::UnknownNodeReference {
            link_index: 3,
            missing_id: "ghost".to_string(),
        });
        assert_eq!(code_of(&err), "relaymap::graph::unknown_node");

        let err = RelaymapError::Graph(GraphError::DuplicateNodeId("a".to_string()));
        assert_eq!(code_of(&err), "relaymap::graph::duplicate_node");

        let err = RelaymapError::Graph(GraphError::InvalidPosition {
            id: "far".to_string(),
        });
        assert_eq!(code_of(&err), "relaymap::graph::invalid_position");
        assert!(to_reportable(&err).help().is_some());

        let err = RelaymapError::Graph(GraphError::InvalidDegree {
            id: "hub".to_string(),
            degree: -2.0,
        });
        assert_eq!(code_of(&err), "relaymap::graph::invalid_degree");
    }

    #[test]
    fn test_display_passes_through() {
        let err = RelaymapError::Config("bad color".to_string());
        let reportable = to_reportable(&err);
        assert_eq!(reportable.to_string(), err.to_string());
        assert_eq!(code_of(&err), "relaymap::config");
        assert!(reportable.help().is_some());
    }

    #[test]
    fn test_io_error_has_no_help() {
        let err = RelaymapError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(code_of(&err), "relaymap::io");
        assert!(to_reportable(&err).help().is_none());
    }

    #[test]
    fn test_report_renders() {
        let err = RelaymapError::Graph(GraphError::MismatchedPosition {
            id: "n1".to_string(),
        });
        let mut out = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut out, &to_reportable(&err))
            .unwrap();
        assert!(out.contains("n1"));
        assert!(out.contains("mismatched_position"));
    }
}
