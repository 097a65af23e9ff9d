use crate::domain::errors::{PredictionError, SchemaLoadError};
use crate::domain::pricing::row::{FeatureRow, FeatureValue};
use crate::domain::pricing::schema::{ColumnKind, FeatureSchema};
use std::collections::{BTreeMap, HashMap};

enum ColumnEncoding {
    Numeric,
    Categorical(HashMap<String, usize>),
}

struct EncodedColumn {
    name: String,
    encoding: ColumnEncoding,
}

/// Turns a feature row into the dense numeric vector a forest consumes.
///
/// Numeric cells pass through, categorical cells become the index of their
/// training-time level and `Missing` becomes `NaN`.
pub struct CategoryEncoder {
    columns: Vec<EncodedColumn>,
}

impl CategoryEncoder {
    pub fn new(
        schema: &FeatureSchema,
        categories: &BTreeMap<String, Vec<String>>,
    ) -> Result<Self, SchemaLoadError> {
        let columns = schema
            .columns()
            .iter()
            .map(|column| -> Result<EncodedColumn, SchemaLoadError> {
                let encoding = match column.kind {
                    ColumnKind::Numeric => ColumnEncoding::Numeric,
                    ColumnKind::Categorical => {
                        let levels = categories.get(&column.name).ok_or_else(|| {
                            SchemaLoadError::MissingVocabulary {
                                column: column.name.clone(),
                            }
                        })?;
                        ColumnEncoding::Categorical(
                            levels
                                .iter()
                                .enumerate()
                                .map(|(i, level)| (level.clone(), i))
                                .collect(),
                        )
                    }
                };
                Ok(EncodedColumn {
                    name: column.name.clone(),
                    encoding,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns })
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn encode(&self, row: &FeatureRow) -> Result<Vec<f64>, PredictionError> {
        if row.len() != self.columns.len() {
            return Err(PredictionError::WidthMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }

        self.columns
            .iter()
            .zip(row.iter())
            .enumerate()
            .map(|(position, (column, (name, value)))| {
                if column.name != name {
                    return Err(PredictionError::ColumnMismatch {
                        position,
                        expected: column.name.clone(),
                        actual: name.to_string(),
                    });
                }
                encode_value(column, value)
            })
            .collect()
    }
}

fn encode_value(column: &EncodedColumn, value: &FeatureValue) -> Result<f64, PredictionError> {
    match (&column.encoding, value) {
        (_, FeatureValue::Missing) => Ok(f64::NAN),
        (ColumnEncoding::Numeric, FeatureValue::Number(n)) => Ok(*n),
        (ColumnEncoding::Categorical(levels), FeatureValue::Category(level)) => levels
            .get(level)
            .map(|&i| i as f64)
            .ok_or_else(|| PredictionError::UnseenCategory {
                column: column.name.clone(),
                value: level.clone(),
            }),
        (ColumnEncoding::Numeric, FeatureValue::Category(_)) => Err(PredictionError::Inference {
            reason: format!("categorical value in numeric column {}", column.name),
        }),
        (ColumnEncoding::Categorical(_), FeatureValue::Number(_)) => {
            Err(PredictionError::Inference {
                reason: format!("numeric value in categorical column {}", column.name),
            })
        }
    }
}
