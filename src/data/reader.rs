//! Readers turning raw text datasets into [`Dataset`]s.
//!
//! All readers take any [`std::io::Read`] so they work on files and in-memory buffers alike.
use super::dataset::{Dataset, Label, Record};
use csv::{ReaderBuilder, Trim};
use nalgebra::DVector;
use std::error::Error;
use std::io::{BufRead, BufReader, Read};

/// Reads a whitespace separated feature file alongside a label file holding one label per line.
///
/// Pairs are read until either input runs out, so trailing unmatched lines are ignored.
pub fn read_features_and_labels<F: Read, L: Read>(
    features: F,
    labels: L,
) -> Result<Dataset<u32>, Box<dyn Error>> {
    let mut feature_reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .flexible(true)
        .trim(Trim::All)
        .from_reader(features);
    let mut label_reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_reader(labels);

    let mut records = Vec::new();
    for (feature_row, label_row) in feature_reader.records().zip(label_reader.records()) {
        let feature_row = feature_row?;
        let label_row = label_row?;

        let label = label_row
            .get(0)
            .ok_or("Missing label")?
            .parse::<Label>()?;
        let values = feature_row
            .iter()
            .filter(|token| !token.is_empty())
            .map(|token| token.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()?;

        records.push(Record::new(label, DVector::from_vec(values))?);
    }

    Dataset::from_records(records)
}

/// Reads an ARFF file of nucleotide sequences.
///
/// Everything up to the `@data` line is skipped. Each data line is `label,x1,...,xN` where a
/// `+` label is positive and `a`, `c`, `g`, `t` map to 1, 2, 3, 4 (anything else maps to 4).
pub fn read_nucleotide_arff<R: Read>(reader: R) -> Result<Dataset<u32>, Box<dyn Error>> {
    let mut lines = BufReader::new(reader).lines();
    for line in lines.by_ref() {
        if line?.trim() == "@data" {
            break;
        }
    }

    let mut records = Vec::new();
    for line in lines {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }
        let mut tokens = line.split(',').map(str::trim);
        let label = match tokens.next() {
            Some("+") => 1,
            _ => 0,
        };
        let values = tokens
            .map(|token| match token {
                "a" => 1,
                "c" => 2,
                "g" => 3,
                _ => 4,
            })
            .collect::<Vec<u32>>();

        records.push(Record::new(label, DVector::from_vec(values))?);
    }

    Dataset::from_records(records)
}

/// Reads attribute display names, one per line.
pub fn read_feature_names<R: Read>(reader: R) -> Result<Vec<String>, Box<dyn Error>> {
    let mut names = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        let name = line.trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Generates the names `p-1` through `p-<count>`.
pub fn positional_feature_names(count: usize) -> Vec<String> {
    (1..=count).map(|position| format!("p-{}", position)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_features_and_labels() {
        let features = "0 1 2\n3 4 5\n1 1 1\n";
        let labels = "1\n0\n1\n";
        let dataset = read_features_and_labels(features.as_bytes(), labels.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.num_features(), 3);
        assert_eq!(dataset.records()[1].label(), 0);
        assert_eq!(dataset.records()[1].features()[2], 5);
    }

    #[test]
    fn test_read_features_and_labels_ignores_unmatched() {
        let features = "0 1\n1 0\n1 1\n";
        let labels = "1\n0\n";
        let dataset = read_features_and_labels(features.as_bytes(), labels.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_read_features_and_labels_bad_label() {
        let features = "0 1\n";
        let labels = "7\n";
        assert!(read_features_and_labels(features.as_bytes(), labels.as_bytes()).is_err());
    }

    #[test]
    fn test_read_features_and_labels_ragged() {
        let features = "0 1\n1\n";
        let labels = "1\n0\n";
        assert!(read_features_and_labels(features.as_bytes(), labels.as_bytes()).is_err());
    }

    #[test]
    fn test_read_nucleotide_arff() {
        let arff = "\
@relation promoters
@attribute class {+,-}
@attribute p-1 {a,c,g,t}
@attribute p-2 {a,c,g,t}
@attribute p-3 {a,c,g,t}
@data
+,a,c,g
-,t,t,a
";
        let dataset = read_nucleotide_arff(arff.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.num_features(), 3);
        assert_eq!(dataset.records()[0].label(), 1);
        assert_eq!(dataset.records()[0].features().as_slice(), &[1, 2, 3]);
        assert_eq!(dataset.records()[1].label(), 0);
        assert_eq!(dataset.records()[1].features().as_slice(), &[4, 4, 1]);
    }

    #[test]
    fn test_read_feature_names() {
        let names = read_feature_names("session_length \n\nreferrer\n".as_bytes()).unwrap();
        assert_eq!(names, vec!["session_length", "referrer"]);
    }

    #[test]
    fn test_positional_feature_names() {
        assert_eq!(positional_feature_names(3), vec!["p-1", "p-2", "p-3"]);
        assert!(positional_feature_names(0).is_empty());
    }
}
