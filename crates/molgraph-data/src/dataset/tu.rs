//! Loader for graph benchmark sets in the TU Dortmund collection format.
//!
//! The format stores every graph of the set in flat files:
//! `<DS>_A.txt` with one `a, b` edge row per line (1-based global node
//! ids, both directions listed), `<DS>_graph_indicator.txt` mapping each
//! node to its graph, and optional `<DS>_graph_labels.txt`,
//! `<DS>_node_labels.txt` and `<DS>_edge_labels.txt`.

use crate::dataset::GraphDataset;
use crate::error::{DataError, DataResult};
use itertools::Itertools;
use molgraph_core::{EdgeSource, Edges, GraphSample};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TuDatasetConfig {
    /// Name of the set, i.e. the `<DS>` file prefix. May stay empty at
    /// construction time; reading files then fails with a missing-field
    /// error.
    #[serde(default)]
    pub dataset_name: String,
    #[serde(default)]
    pub data_directory: Option<PathBuf>,
}

#[derive(Debug)]
pub struct TuDataset {
    data_directory: PathBuf,
    dataset_name: String,
    graphs: Vec<GraphSample>,
}

impl TuDataset {
    pub fn new(config: TuDatasetConfig) -> Self {
        TuDataset {
            data_directory: config.data_directory.unwrap_or_else(|| PathBuf::from(".")),
            dataset_name: config.dataset_name,
            graphs: Vec::new(),
        }
    }

    fn file(&self, suffix: &str) -> PathBuf {
        self.data_directory
            .join(format!("{}_{suffix}.txt", self.dataset_name))
    }

    fn read_column<T: std::str::FromStr>(&self, suffix: &str) -> DataResult<Vec<T>> {
        let path = self.file(suffix);
        let text = std::fs::read_to_string(&path)?;
        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                line.trim().parse().map_err(|_| {
                    DataError::format(idx + 1, format!("invalid value {:?} in {suffix} file", line))
                })
            })
            .collect()
    }

    fn read_optional_column<T: std::str::FromStr>(&self, suffix: &str) -> DataResult<Option<Vec<T>>> {
        if self.file(suffix).exists() {
            Ok(Some(self.read_column(suffix)?))
        } else {
            Ok(None)
        }
    }
}

impl GraphDataset for TuDataset {
    fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    fn graphs(&self) -> &[GraphSample] {
        &self.graphs
    }

    /// The TU files already are the structured form; nothing to stage.
    fn prepare_data(&mut self, _overwrite: bool) -> DataResult<()> {
        info!(
            dataset = self.dataset_name,
            "TU format needs no preparation step"
        );
        Ok(())
    }

    fn read_in_memory(&mut self) -> DataResult<()> {
        if self.dataset_name.is_empty() {
            return Err(DataError::MissingField("dataset_name"));
        }
        // node -> graph assignment, 1-based graph ids, grouped runs
        let indicator: Vec<usize> = self.read_column("graph_indicator")?;
        let graph_count = indicator.iter().copied().max().unwrap_or(0);

        // the per-graph offsets below require each graph's nodes to be a
        // contiguous run in the indicator
        let mut node_counts = vec![0usize; graph_count];
        let mut run_started = vec![false; graph_count];
        let mut current = None;
        for (idx, &g) in indicator.iter().enumerate() {
            if g == 0 || g > graph_count {
                return Err(DataError::format(
                    idx + 1,
                    format!("graph id {g} out of range"),
                ));
            }
            if current != Some(g) {
                if run_started[g - 1] {
                    return Err(DataError::format(
                        idx + 1,
                        format!("graph id {g} appears in more than one indicator run"),
                    ));
                }
                run_started[g - 1] = true;
                current = Some(g);
            }
            node_counts[g - 1] += 1;
        }
        // global node id -> index of the first node of its graph
        let offsets: Vec<usize> = node_counts
            .iter()
            .scan(0usize, |acc, c| {
                let start = *acc;
                *acc += c;
                Some(start)
            })
            .collect();

        let node_labels: Option<Vec<u32>> = self.read_optional_column("node_labels")?;
        let mut node_iter = node_labels
            .unwrap_or_else(|| vec![0; indicator.len()])
            .into_iter();
        self.graphs = node_counts
            .iter()
            .map(|&c| GraphSample::from_node_labels(node_iter.by_ref().take(c).collect_vec()))
            .collect();

        if let Some(labels) = self.read_optional_column::<f64>("graph_labels")? {
            for (graph, label) in self.graphs.iter_mut().zip(labels) {
                graph.label = Some(vec![label]);
            }
        }

        // edge rows are already directed in this format, no symmetrization
        let path = self.file("A");
        let text = std::fs::read_to_string(&path)?;
        let edge_labels: Option<Vec<f64>> = self.read_optional_column("edge_labels")?;
        let mut per_graph: Vec<Edges> = (0..graph_count)
            .map(|_| Edges {
                indices: Vec::new(),
                attributes: Vec::new(),
                source: EdgeSource::FromFile,
            })
            .collect();

        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (a, b) = parse_edge_row(idx + 1, line)?;
            if a == 0 || a > indicator.len() || b == 0 || b > indicator.len() {
                return Err(DataError::format(
                    idx + 1,
                    format!("edge ({a}, {b}) references a node outside the indicator"),
                ));
            }
            let g = indicator[a - 1];
            if indicator[b - 1] != g {
                return Err(DataError::format(
                    idx + 1,
                    format!("edge ({a}, {b}) crosses graph boundaries"),
                ));
            }
            let offset = offsets[g - 1];
            let attr = edge_labels
                .as_ref()
                .and_then(|l| l.get(idx).copied())
                .unwrap_or(1.0);
            per_graph[g - 1].indices.push([
                (a - 1 - offset) as u32,
                (b - 1 - offset) as u32,
            ]);
            per_graph[g - 1].attributes.push(attr);
        }
        for (graph, edges) in self.graphs.iter_mut().zip(per_graph) {
            graph.set_edges(edges);
        }
        Ok(())
    }
}

fn parse_edge_row(line_number: usize, line: &str) -> DataResult<(usize, usize)> {
    let mut fields = line.split(',').map(str::trim);
    let (Some(a), Some(b)) = (fields.next(), fields.next()) else {
        return Err(DataError::format(
            line_number,
            format!("expected 'a, b' edge row, got {:?}", line.trim_end()),
        ));
    };
    let a = a
        .parse()
        .map_err(|_| DataError::format(line_number, format!("invalid node id {a:?}")))?;
    let b = b
        .parse()
        .map_err(|_| DataError::format(line_number, format!("invalid node id {b:?}")))?;
    Ok((a, b))
}
