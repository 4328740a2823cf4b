use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use crate::core::error::{Error, Result};
use crate::hybrid::scorer::LayerResults;
use crate::query::planner::Layer;

pub type LayerFuture = Pin<Box<dyn Future<Output = Result<LayerResults>> + Send>>;

#[derive(Debug, Clone, Copy, Default)]
pub struct LayerTiming {
    pub timed_out: bool,
    pub failed: bool,
    pub elapsed_ms: u64,
}

#[derive(Debug, Default)]
pub struct ExecutionReport {
    pub results: Vec<LayerResults>,
    pub timing: HashMap<Layer, LayerTiming>,
}

/// Runs every active layer as its own `tokio` task with its own deadline
/// (spec §4.11). A layer that times out or errors contributes an empty
/// result and is recorded in `timing`; the overall search only fails
/// with `RetrievalUnavailable` when every layer fails.
pub struct ParallelExecutor {
    per_layer_timeout: Duration,
}

impl ParallelExecutor {
    pub fn new(per_layer_timeout_ms: u64) -> Self {
        ParallelExecutor { per_layer_timeout: Duration::from_millis(per_layer_timeout_ms) }
    }

    pub async fn execute(&self, tasks: Vec<(Layer, LayerFuture)>) -> Result<ExecutionReport> {
        if tasks.is_empty() {
            return Ok(ExecutionReport::default());
        }

        let mut handles = Vec::with_capacity(tasks.len());
        for (layer, fut) in tasks {
            let timeout = self.per_layer_timeout;
            handles.push(tokio::spawn(async move {
                let start = Instant::now();
                let outcome = tokio::time::timeout(timeout, fut).await;
                let elapsed_ms = start.elapsed().as_millis() as u64;
                match outcome {
                    Ok(Ok(result)) => (layer, Some(result), LayerTiming { timed_out: false, failed: false, elapsed_ms }),
                    Ok(Err(_)) => (layer, None, LayerTiming { timed_out: false, failed: true, elapsed_ms }),
                    Err(_) => (layer, None, LayerTiming { timed_out: true, failed: false, elapsed_ms }),
                }
            }));
        }

        let mut report = ExecutionReport::default();
        let mut succeeded = 0;
        for handle in handles {
            let (layer, result, timing) =
                handle.await.map_err(|e| Error::internal(format!("layer task panicked: {e}")))?;
            match result {
                Some(r) => {
                    succeeded += 1;
                    report.results.push(r);
                }
                None => report.results.push(LayerResults { layer: Some(layer), scores: HashMap::new() }),
            }
            report.timing.insert(layer, timing);
        }

        if succeeded == 0 {
            return Err(Error::retrieval_unavailable("every retrieval layer failed or timed out"));
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_layer(layer: Layer, name: &str, score: f32) -> LayerFuture {
        let scores = [(name.to_string(), score)].into_iter().collect();
        Box::pin(async move { Ok(LayerResults { layer: Some(layer), scores }) })
    }

    fn slow_layer(layer: Layer) -> LayerFuture {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(LayerResults { layer: Some(layer), scores: HashMap::new() })
        })
    }

    fn failing_layer(layer: Layer) -> LayerFuture {
        let _ = layer;
        Box::pin(async move { Err(Error::internal("boom")) })
    }

    #[tokio::test]
    async fn partial_timeout_does_not_fail_whole_search() {
        let executor = ParallelExecutor::new(20);
        let report = executor
            .execute(vec![(Layer::Lexical, ok_layer(Layer::Lexical, "a", 1.0)), (Layer::Semantic, slow_layer(Layer::Semantic))])
            .await
            .unwrap();

        assert!(report.timing[&Layer::Semantic].timed_out);
        assert!(!report.timing[&Layer::Lexical].timed_out);
        assert_eq!(report.results.len(), 2);
    }

    #[tokio::test]
    async fn all_layers_failing_surfaces_retrieval_unavailable() {
        let executor = ParallelExecutor::new(50);
        let result = executor
            .execute(vec![(Layer::Lexical, failing_layer(Layer::Lexical)), (Layer::Semantic, slow_layer(Layer::Semantic))])
            .await;
        assert!(result.is_err());
        assert!(result.unwrap_err().is_kind(crate::core::error::ErrorKind::RetrievalUnavailable));
    }
}
