use crate::domain::errors::ReconstructionError;
use crate::domain::pricing::schema::{ColumnKind, FeatureSchema};

/// A single cell of a feature row.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
    /// Explicitly absent. The model applies its own missing-value handling.
    Missing,
}

impl FeatureValue {
    pub fn from_float(value: Option<f64>) -> Self {
        value.map_or(FeatureValue::Missing, FeatureValue::Number)
    }

    pub fn from_text(value: Option<&str>) -> Self {
        value.map_or(FeatureValue::Missing, |s| FeatureValue::Category(s.to_string()))
    }

    /// `Missing` fits every column kind.
    pub fn fits(&self, kind: ColumnKind) -> bool {
        matches!(
            (self, kind),
            (FeatureValue::Missing, _)
                | (FeatureValue::Number(_), ColumnKind::Numeric)
                | (FeatureValue::Category(_), ColumnKind::Categorical)
        )
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FeatureValue::Missing)
    }
}

/// One assembled input record, in schema order. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    columns: Vec<String>,
    values: Vec<FeatureValue>,
}

impl FeatureRow {
    pub fn builder(schema: &FeatureSchema) -> FeatureRowBuilder<'_> {
        FeatureRowBuilder {
            schema,
            slots: vec![None; schema.len()],
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Fills a row column by column against a schema.
///
/// Rejects columns outside the schema, values of the wrong kind and columns
/// set twice; `build` rejects any column left unset.
#[derive(Debug)]
pub struct FeatureRowBuilder<'a> {
    schema: &'a FeatureSchema,
    slots: Vec<Option<FeatureValue>>,
}

impl FeatureRowBuilder<'_> {
    pub fn set(
        &mut self,
        column: &str,
        value: FeatureValue,
    ) -> Result<&mut Self, ReconstructionError> {
        let index = self
            .schema
            .position(column)
            .ok_or_else(|| ReconstructionError::UnknownColumn {
                column: column.to_string(),
            })?;

        let kind = self.schema.columns()[index].kind;
        if !value.fits(kind) {
            return Err(ReconstructionError::KindMismatch {
                column: column.to_string(),
                expected: kind.as_str(),
            });
        }

        let slot = &mut self.slots[index];
        if slot.is_some() {
            return Err(ReconstructionError::DuplicateValue {
                column: column.to_string(),
            });
        }
        *slot = Some(value);
        Ok(self)
    }

    pub fn build(self) -> Result<FeatureRow, ReconstructionError> {
        let unfilled: Vec<String> = self
            .schema
            .columns()
            .iter()
            .zip(&self.slots)
            .filter(|(_, slot)| slot.is_none())
            .map(|(column, _)| column.name.clone())
            .collect();
        if !unfilled.is_empty() {
            return Err(ReconstructionError::Unfilled { columns: unfilled });
        }

        Ok(FeatureRow {
            columns: self.schema.names().map(str::to_string).collect(),
            values: self.slots.into_iter().flatten().collect(),
        })
    }
}
