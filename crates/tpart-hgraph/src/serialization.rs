use serde::{Deserialize, Serialize};
use tpart_core::errors::{ErrorInfo, TpError};
use tpart_core::provenance::SchemaVersion;

use crate::hypergraph::{Hypergraph, HypergraphBuilder, HYPERGRAPH_SCHEMA};

/// Serializes the graph to a compact binary representation using `bincode`.
pub fn graph_to_bytes(graph: &Hypergraph) -> Result<Vec<u8>, TpError> {
    let serializable = SerializableGraph::from_graph(graph);
    bincode::serialize(&serializable)
        .map_err(|err| TpError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a graph from its binary representation.
pub fn graph_from_bytes(bytes: &[u8]) -> Result<Hypergraph, TpError> {
    let serializable: SerializableGraph = bincode::deserialize(bytes)
        .map_err(|err| TpError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    serializable.into_graph()
}

/// Serializes the graph to a JSON string.
pub fn graph_to_json(graph: &Hypergraph) -> Result<String, TpError> {
    let serializable = SerializableGraph::from_graph(graph);
    serde_json::to_string_pretty(&serializable)
        .map_err(|err| TpError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a graph from a JSON string.
pub fn graph_from_json(json: &str) -> Result<Hypergraph, TpError> {
    let serializable: SerializableGraph = serde_json::from_str(json)
        .map_err(|err| TpError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_graph()
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableGraph {
    schema_version: SchemaVersion,
    vertex_dimensions: usize,
    hyperedge_dimensions: usize,
    placement_dimensions: usize,
    vertices: Vec<SerializableVertex>,
    hyperedges: Vec<SerializableHyperedge>,
    timing: Option<SerializableTiming>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableVertex {
    weight: Vec<f64>,
    #[serde(default)]
    location: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableHyperedge {
    pins: Vec<usize>,
    weight: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableTiming {
    clock_period: f64,
    original_hyperedge_slack: Vec<f64>,
    hyperedge_slack: Vec<f64>,
    paths: Vec<SerializablePath>,
    derived: Option<SerializableDerived>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializablePath {
    vertices: Vec<usize>,
    hyperedges: Vec<usize>,
    original_slack: f64,
    slack: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableDerived {
    path_timing_cost: Vec<f64>,
    hyperedge_timing_weight: Vec<f64>,
}

impl SerializableGraph {
    fn from_graph(graph: &Hypergraph) -> Self {
        let vertices = (0..graph.num_vertices())
            .map(|v| SerializableVertex {
                weight: graph.vertex_weight(v).to_vec(),
                location: graph.placement(v).to_vec(),
            })
            .collect();
        let hyperedges = (0..graph.num_hyperedges())
            .map(|e| SerializableHyperedge {
                pins: graph.hyperedge(e).to_vec(),
                weight: graph.hyperedge_weight(e).to_vec(),
            })
            .collect();
        let timing = graph.timing().map(|timing| SerializableTiming {
            clock_period: timing.clock_period(),
            original_hyperedge_slack: timing.original_hyperedge_slack().to_vec(),
            hyperedge_slack: timing.hyperedge_slack().to_vec(),
            paths: timing
                .paths()
                .iter()
                .map(|path| SerializablePath {
                    vertices: path.vertices().to_vec(),
                    hyperedges: path.hyperedges().to_vec(),
                    original_slack: path.original_slack(),
                    slack: path.slack(),
                })
                .collect(),
            derived: timing.is_initialized().then(|| SerializableDerived {
                path_timing_cost: timing.path_timing_cost().to_vec(),
                hyperedge_timing_weight: timing.hyperedge_timing_weight().to_vec(),
            }),
        });
        Self {
            schema_version: HYPERGRAPH_SCHEMA,
            vertex_dimensions: graph.vertex_dimensions(),
            hyperedge_dimensions: graph.hyperedge_dimensions(),
            placement_dimensions: graph.placement_dimensions(),
            vertices,
            hyperedges,
            timing,
        }
    }

    fn into_graph(self) -> Result<Hypergraph, TpError> {
        if !HYPERGRAPH_SCHEMA.reads(&self.schema_version) {
            return Err(TpError::Serde(
                ErrorInfo::new("schema-version", "unsupported hypergraph schema version")
                    .with_context(
                        "found",
                        format!(
                            "{}.{}.{}",
                            self.schema_version.major,
                            self.schema_version.minor,
                            self.schema_version.patch
                        ),
                    ),
            ));
        }

        let mut builder = HypergraphBuilder::new(self.vertex_dimensions, self.hyperedge_dimensions)
            .with_placement_dimensions(self.placement_dimensions);
        if let Some(timing) = &self.timing {
            builder = builder.with_clock_period(timing.clock_period);
        }
        for vertex in self.vertices {
            builder.add_vertex_with_placement(vertex.weight, vertex.location)?;
        }
        for hyperedge in self.hyperedges {
            builder.add_hyperedge(&hyperedge.pins, hyperedge.weight)?;
        }

        let Some(timing) = self.timing else {
            return builder.build();
        };
        for (e, slack) in timing.original_hyperedge_slack.iter().enumerate() {
            builder.set_hyperedge_slack(e, *slack)?;
        }
        for path in &timing.paths {
            builder.add_timing_path(&path.vertices, &path.hyperedges, path.original_slack)?;
        }
        let mut graph = builder.build()?;
        if let Some(data) = graph.timing_mut() {
            for (e, slack) in timing.hyperedge_slack.iter().enumerate() {
                data.set_hyperedge_slack(e, *slack)?;
            }
            for (p, path) in timing.paths.iter().enumerate() {
                data.set_path_slack(p, path.slack)?;
            }
            if let Some(derived) = timing.derived {
                data.set_derived_costs(derived.path_timing_cost, derived.hyperedge_timing_weight)?;
            }
        }
        Ok(graph)
    }
}
