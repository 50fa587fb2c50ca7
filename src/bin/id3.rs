use clap::{Args, Parser, Subcommand};
use nalgebra::DVector;
use rusty_id3::data::dataset::{Dataset, Label};
use rusty_id3::data::reader::{
    positional_feature_names, read_feature_names, read_features_and_labels, read_nucleotide_arff,
};
use rusty_id3::forests::classifier::BaggingClassifier;
use rusty_id3::metrics::confusion::ClassificationMetrics;
use rusty_id3::trees::classifier::DecisionTreeClassifier;
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "id3")]
#[command(about = "Chi-square pruned ID3 decision trees and bagging ensembles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a single decision tree and evaluate it on the test data
    Tree {
        #[command(flatten)]
        data: DataArgs,

        /// Chi-square significance threshold, in (0, 1)
        #[arg(short, long, default_value = "0.05")]
        significance: f64,

        /// Print the induced tree
        #[arg(long)]
        show_tree: bool,
    },

    /// Train a bagging ensemble and evaluate it on the test data
    Bagging {
        #[command(flatten)]
        data: DataArgs,

        /// Number of bootstrap samples (one tree each)
        #[arg(short = 'n', long, default_value = "10")]
        trees: usize,

        /// Chi-square significance threshold, in (0, 1)
        #[arg(short, long, default_value = "0.05")]
        significance: f64,

        /// Random seed for reproducible bootstrap samples
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct DataArgs {
    /// Training data: ARFF file, or whitespace separated features when labels are given
    train: PathBuf,

    /// Test data, in the same format as the training data
    test: PathBuf,

    /// Training labels, one per line
    #[arg(long, requires = "test_labels")]
    train_labels: Option<PathBuf>,

    /// Test labels, one per line
    #[arg(long, requires = "train_labels")]
    test_labels: Option<PathBuf>,

    /// Attribute names, one per line (defaults to p-1, p-2, ...)
    #[arg(long)]
    names: Option<PathBuf>,

    /// Write one predicted label per line to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn read_dataset(features: &Path, labels: Option<&Path>) -> Result<Dataset<u32>, Box<dyn Error>> {
    match labels {
        Some(labels) => read_features_and_labels(File::open(features)?, File::open(labels)?),
        None => read_nucleotide_arff(File::open(features)?),
    }
}

fn load(data: &DataArgs) -> Result<(Dataset<u32>, Dataset<u32>, Vec<String>), Box<dyn Error>> {
    let train = read_dataset(&data.train, data.train_labels.as_deref())?;
    let test = read_dataset(&data.test, data.test_labels.as_deref())?;
    let names = match &data.names {
        Some(path) => read_feature_names(File::open(path)?)?,
        None => positional_feature_names(train.num_features()),
    };
    println!(
        "Loaded {} training and {} test records with {} attributes",
        train.len(),
        test.len(),
        names.len()
    );
    Ok((train, test, names))
}

fn write_predictions(path: &Path, predictions: &DVector<Label>) -> Result<(), Box<dyn Error>> {
    let mut writer = BufWriter::new(File::create(path)?);
    for label in predictions.iter() {
        writeln!(writer, "{}", label)?;
    }
    writer.flush()?;
    Ok(())
}

fn report(
    model: &impl ClassificationMetrics,
    test: &Dataset<u32>,
    predictions: &DVector<Label>,
) -> Result<(), Box<dyn Error>> {
    let labels = test.labels();
    println!("Matches: {}", model.matches(&labels, predictions)?);
    println!(
        "Accuracy of Data: {:.2}%",
        100.0 * model.accuracy(&labels, predictions)?
    );
    println!("Precision: {:.4}", model.precision(&labels, predictions)?);
    println!("Recall: {:.4}", model.recall(&labels, predictions)?);
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Tree {
            data,
            significance,
            show_tree,
        } => {
            let (train, test, names) = load(&data)?;
            let mut classifier = DecisionTreeClassifier::with_params(Some(significance))?;
            println!("{}", classifier.fit(&train, &names)?);
            let root = classifier.root().ok_or("Tree wasn't built yet.")?;
            if show_tree {
                print!("{}", root);
            }

            let predictions = classifier.predict_dataset(&test)?;
            if let Some(path) = &data.output {
                write_predictions(path, &predictions)?;
            }

            println!("Test-Data Prediction Statistics");
            println!("-------------------------------");
            println!("Tree size: {}", root.node_count());
            println!("Tree depth: {}", root.depth());
            report(&classifier, &test, &predictions)
        }
        Commands::Bagging {
            data,
            trees,
            significance,
            seed,
        } => {
            let (train, test, names) = load(&data)?;
            let mut bagging = BaggingClassifier::with_params(Some(trees), Some(significance))?;
            println!("{}", bagging.fit(&train, &names, seed)?);

            let predictions = bagging.predict_dataset(&test)?;
            if let Some(path) = &data.output {
                write_predictions(path, &predictions)?;
            }

            let total_nodes = bagging
                .trees()
                .iter()
                .map(|tree| tree.node_count())
                .sum::<usize>();
            println!("Test-Data Prediction Statistics");
            println!("-------------------------------");
            println!("Trees: {} ({} nodes in total)", bagging.trees().len(), total_nodes);
            report(&bagging, &test, &predictions)
        }
    }
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
