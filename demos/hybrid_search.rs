//! End-to-end hybrid search demo over in-memory mock backends.
//!
//! Seeds a vector source and a text source with overlapping rankings,
//! runs one fused query, and prints the merged results with scores and
//! timing, mirroring what a real deployment returns.

use rankmerge::engine::HybridSearchEngine;
use rankmerge::mock::{MockEmbedder, MockRetriever};
use rankmerge::request::SearchRequest;
use rankmerge::types::SourceKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rankmerge=debug".into()),
        )
        .init();

    let mut vector = MockRetriever::new(SourceKind::Vector);
    vector.push_hit("movie-42", Some("A weathered boxer returns for one last fight"));
    vector.push_hit("movie-7", Some("Two rivals spar their way to friendship"));
    vector.push_hit("movie-13", Some("A documentary about championship chess"));

    let mut text = MockRetriever::new(SourceKind::Text);
    text.push_hit("movie-7", Some("Two rivals spar their way to friendship"));
    text.push_hit("movie-13", Some("A documentary about championship chess"));
    text.push_hit("movie-99", Some("A heist crew reunites in Lisbon"));

    let engine = HybridSearchEngine::with_embedder(vector, text, MockEmbedder::new(32));

    let request = SearchRequest::new("underdog sports rivalry")
        .with_k(5)
        .with_weights(1.0, 1.0);
    let response = engine.search(request).await?;

    println!(
        "\nQuery executed in {:.2?} (vector {:.2}ms, text {:.2}ms, fuse {:.2}ms){}",
        response.elapsed,
        response.time_breakdown.vector_ms,
        response.time_breakdown.text_ms,
        response.time_breakdown.fuse_ms,
        if response.degraded { " [degraded]" } else { "" },
    );

    println!("\nSearch results:");
    for (position, result) in response.results.iter().enumerate() {
        let ranks = result
            .contributing_ranks
            .iter()
            .map(|(source, rank)| format!("{source}#{rank}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{}. {} (score {:.6}, from {})",
            position + 1,
            result.payload.as_deref().unwrap_or(&result.doc_id),
            result.fused_score,
            ranks,
        );
    }

    Ok(())
}
