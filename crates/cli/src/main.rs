use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use predictor::{Basis, Explanation, ItemPredictor};
use rating_store::{parser, MovieId, PredictionWriter, RatingIndex, UserId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// cf-predict - Item-based collaborative filtering rating predictor
#[derive(Parser)]
#[command(name = "cf-predict")]
#[command(about = "Predict movie ratings with item-based collaborative filtering", long_about = None)]
struct Cli {
    /// Path to the training file (userId,movieId,rating per line)
    #[arg(short, long, default_value = "training_data.csv")]
    training: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict a rating for every line of a query file
    Predict {
        /// Query file (userId,movieId per line)
        #[arg(short, long, default_value = "test_data.csv")]
        queries: PathBuf,

        /// Output file (userId,movieId,predictedRating per line)
        #[arg(short, long, default_value = "predicted_ratings.csv")]
        output: PathBuf,

        /// Fixed number of decimals in the output (0-17)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=17))]
        precision: Option<u8>,

        /// Precompute every item-item similarity before predicting
        #[arg(long)]
        precompute: bool,
    },

    /// Predict a single rating
    Estimate {
        /// User ID
        #[arg(long)]
        user_id: UserId,

        /// Movie ID
        #[arg(long)]
        movie_id: MovieId,

        /// Show every neighbor movie that contributed
        #[arg(long)]
        explain: bool,

        /// Print the explanation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the cosine similarity of two movies
    Similarity {
        #[arg(long)]
        movie_a: MovieId,

        #[arg(long)]
        movie_b: MovieId,
    },

    /// Show counts of users, movies and ratings in the training data
    Stats,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let index = Arc::new(load_index(&cli.training)?);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Predict {
            queries,
            output,
            precision,
            precompute,
        } => handle_predict(
            index,
            &queries,
            &output,
            precision.map(usize::from),
            precompute,
        )?,
        Commands::Estimate {
            user_id,
            movie_id,
            explain,
            json,
        } => handle_estimate(index, user_id, movie_id, explain, json)?,
        Commands::Similarity { movie_a, movie_b } => handle_similarity(index, movie_a, movie_b)?,
        Commands::Stats => handle_stats(&index),
    }

    Ok(())
}

fn load_index(path: &Path) -> Result<RatingIndex> {
    let start = Instant::now();
    let index = RatingIndex::load_from_file(path)
        .with_context(|| format!("Failed to load training data from {}", path.display()))?;
    eprintln!(
        "{} Loaded training data in {:?}",
        "✓".green(),
        start.elapsed()
    );
    Ok(index)
}

/// Handle the 'predict' command
fn handle_predict(
    index: Arc<RatingIndex>,
    queries_path: &Path,
    output_path: &Path,
    precision: Option<usize>,
    precompute: bool,
) -> Result<()> {
    let queries = parser::load_queries(queries_path)
        .with_context(|| format!("Failed to load queries from {}", queries_path.display()))?;
    info!("Loaded {} queries", queries.len());

    let mut predictor = ItemPredictor::new(index);
    if precompute {
        let start = Instant::now();
        predictor = predictor.with_precomputed_similarities();
        info!("Precomputed similarities in {:?}", start.elapsed());
    }

    let start = Instant::now();
    let predictions = predictor.predict_batch(&queries);
    let elapsed = start.elapsed();

    let mut writer = PredictionWriter::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?
        .with_precision(precision);
    writer
        .write_all(&predictions)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    let written = writer.written();
    writer
        .finish()
        .with_context(|| format!("Failed to flush {}", output_path.display()))?;

    println!(
        "{} Wrote {} predictions to {} in {:?}",
        "✓".green(),
        written,
        output_path.display(),
        elapsed
    );
    Ok(())
}

/// Handle the 'estimate' command
fn handle_estimate(
    index: Arc<RatingIndex>,
    user_id: UserId,
    movie_id: MovieId,
    explain: bool,
    json: bool,
) -> Result<()> {
    let predictor = ItemPredictor::new(index);
    let explanation = predictor.explain(user_id, movie_id);

    if json {
        println!("{}", serde_json::to_string_pretty(&explanation)?);
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Predicted rating for user {} on movie {}: {:.4}",
            user_id, movie_id, explanation.prediction
        )
        .bold()
        .blue()
    );
    println!("{}{}", "• ".green(), describe_basis(&explanation));

    if explain {
        print_neighbors(&explanation);
    }
    Ok(())
}

/// Handle the 'similarity' command
fn handle_similarity(index: Arc<RatingIndex>, movie_a: MovieId, movie_b: MovieId) -> Result<()> {
    let predictor = ItemPredictor::new(index);
    let similarity = predictor
        .similarity(movie_a, movie_b)
        .ok_or_else(|| anyhow!("Movie {} or {} not found in training data", movie_a, movie_b))?;

    println!(
        "Cosine similarity between movie {} and movie {}: {:.6}",
        movie_a, movie_b, similarity
    );
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(index: &RatingIndex) {
    let (users, movies, ratings) = index.counts();
    println!("{}", "Training data:".bold().blue());
    println!("{}Users: {}", "• ".cyan(), users);
    println!("{}Movies: {}", "• ".cyan(), movies);
    println!("{}Ratings: {}", "• ".cyan(), ratings);
}

fn describe_basis(explanation: &Explanation) -> String {
    match explanation.basis {
        Basis::UnknownMovie => "Movie not found in training data".to_string(),
        Basis::UnknownUser => "User not found in training data".to_string(),
        Basis::NoSimilarNeighbors => format!(
            "No similar movie among the {} the user rated",
            explanation.neighbors.len()
        ),
        Basis::WeightedAverage => format!(
            "Weighted average over {} rated movies (similarity sum {:.4})",
            explanation.neighbors.len(),
            explanation.similarity_sum
        ),
    }
}

/// Helper function to print the neighbors behind a prediction
fn print_neighbors(explanation: &Explanation) {
    if explanation.neighbors.is_empty() {
        return;
    }

    let mut neighbors: Vec<_> = explanation.neighbors.iter().collect();
    neighbors.sort_by(|a, b| {
        b.similarity
            .abs()
            .partial_cmp(&a.similarity.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    println!("Contributing movies:");
    for (rank, neighbor) in neighbors.iter().enumerate() {
        println!(
            "{}. movie {} - similarity {:.4}, rated {} (contributes {:.4})",
            (rank + 1).to_string().green(),
            neighbor.movie_id,
            neighbor.similarity,
            neighbor.rating,
            neighbor.weighted_rating()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_in_range() {
        let cli = Cli::try_parse_from(["cf-predict", "predict", "--precision", "4"]).unwrap();
        match cli.command {
            Commands::Predict { precision, .. } => assert_eq!(precision, Some(4)),
            _ => panic!("expected predict command"),
        }
    }

    #[test]
    fn test_precision_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["cf-predict", "predict", "--precision", "18"]).is_err());
        assert!(Cli::try_parse_from(["cf-predict", "predict", "--precision", "1000000000"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["cf-predict", "stats"]).unwrap();
        assert_eq!(cli.training, PathBuf::from("training_data.csv"));
        assert!(matches!(cli.command, Commands::Stats));
    }
}
