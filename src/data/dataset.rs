use nalgebra::{DMatrix, DVector};
use num_traits::{FromPrimitive, Num, ToPrimitive};
use rand::seq::SliceRandom;
use rand::Rng;
use rand::{rngs::StdRng, SeedableRng};
use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::Hash;

/// Class label of a record, either 0 or 1.
pub type Label = u8;

pub trait DataValue:
    Debug + Clone + Copy + Num + FromPrimitive + ToPrimitive + Send + Sync + Display + 'static
{
}

impl<T> DataValue for T where
    T: Debug + Clone + Copy + Num + FromPrimitive + ToPrimitive + Send + Sync + Display + 'static
{
}

/// A small discrete attribute value. Values are only ever compared for equality
/// and ordered to keep branch iteration deterministic.
pub trait Categorical: DataValue + Eq + Ord + Hash {}
impl<T> Categorical for T where T: DataValue + Eq + Ord + Hash {}

/// A labeled example: a binary class value and one categorical value per attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct Record<XT: Categorical> {
    label: Label,
    features: DVector<XT>,
}

impl<XT: Categorical> Record<XT> {
    pub fn new(label: Label, features: DVector<XT>) -> Result<Self, Box<dyn Error>> {
        if label > 1 {
            return Err(format!("Label must be 0 or 1, got {}.", label).into());
        }
        Ok(Self { label, features })
    }

    pub fn from_slice(label: Label, features: &[XT]) -> Result<Self, Box<dyn Error>> {
        Self::new(label, DVector::from_column_slice(features))
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn features(&self) -> &DVector<XT> {
        &self.features
    }

    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    pub fn is_positive(&self) -> bool {
        self.label == 1
    }
}

/// An ordered collection of records sharing one feature-vector length.
#[derive(Clone, PartialEq)]
pub struct Dataset<XT: Categorical> {
    records: Vec<Record<XT>>,
    num_features: usize,
}

impl<XT: Categorical> Debug for Dataset<XT> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    records: [\n")?;

        for record in &self.records {
            write!(f, "        {} <- [", record.label)?;
            for value in record.features.iter() {
                write!(f, "{:?}, ", value)?;
            }
            writeln!(f, "],")?;
        }

        write!(f, "    ]\n}}")
    }
}

impl<XT: Categorical> Dataset<XT> {
    /// Builds a dataset from a feature matrix (one row per record) and a label vector.
    pub fn new(x: DMatrix<XT>, y: DVector<Label>) -> Result<Self, Box<dyn Error>> {
        if x.nrows() != y.len() {
            return Err("Features and labels are of different sizes.".into());
        }
        let records = x
            .row_iter()
            .zip(y.iter())
            .map(|(row, &label)| Record::new(label, row.transpose()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            records,
            num_features: x.ncols(),
        })
    }

    pub fn from_records(records: Vec<Record<XT>>) -> Result<Self, Box<dyn Error>> {
        let num_features = records.first().map_or(0, Record::num_features);
        if let Some(position) = records
            .iter()
            .position(|record| record.num_features() != num_features)
        {
            return Err(format!(
                "Record {} has {} features, expected {}.",
                position,
                records[position].num_features(),
                num_features
            )
            .into());
        }
        Ok(Self {
            records,
            num_features,
        })
    }

    pub fn records(&self) -> &[Record<XT>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn labels(&self) -> DVector<Label> {
        DVector::from_iterator(self.len(), self.records.iter().map(Record::label))
    }

    pub fn positive_count(&self) -> usize {
        self.records.iter().filter(|record| record.is_positive()).count()
    }

    pub fn train_test_split(
        &self,
        train_size: f64,
        seed: Option<u64>,
    ) -> Result<(Self, Self), Box<dyn Error>> {
        if !(0.0..=1.0).contains(&train_size) {
            return Err("Train size should be between 0.0 and 1.0".into());
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices = (0..self.len()).collect::<Vec<_>>();
        indices.shuffle(&mut rng);
        let train_size = (self.len() as f64 * train_size).floor() as usize;
        let (train_indices, test_indices) = indices.split_at(train_size);

        let pick = |indices: &[usize]| Self {
            records: indices
                .iter()
                .map(|&index| self.records[index].clone())
                .collect(),
            num_features: self.num_features,
        };

        Ok((pick(train_indices), pick(test_indices)))
    }

    /// Bootstrap sample: `sample_size` uniform draws with replacement, each drawn
    /// record copied into the new dataset.
    pub fn samples(&self, sample_size: usize, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let nrows = self.len();
        let records = if nrows == 0 {
            Vec::new()
        } else {
            (0..sample_size)
                .map(|_| self.records[rng.gen_range(0..nrows)].clone())
                .collect()
        };

        Self {
            records,
            num_features: self.num_features,
        }
    }
}
