use crate::domain::errors::SchemaLoadError;
use crate::domain::pricing::transform::TargetTransform;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureColumn {
    pub name: String,
    pub kind: ColumnKind,
}

impl FeatureColumn {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Numeric,
        }
    }

    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Categorical,
        }
    }
}

/// Ordered columns a trained model expects as input.
///
/// Order is significant: the model consumes positions, not names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<FeatureColumn>) -> Result<Self, SchemaLoadError> {
        if columns.is_empty() {
            return Err(SchemaLoadError::EmptySchema);
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaLoadError::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
        }

        Ok(Self { columns })
    }

    /// Numeric columns first, then categorical, as the training pipeline
    /// concatenates them.
    pub fn from_groups<S: AsRef<str>>(
        numeric: &[S],
        categorical: &[S],
    ) -> Result<Self, SchemaLoadError> {
        let columns = numeric
            .iter()
            .map(|n| FeatureColumn::numeric(n.as_ref()))
            .chain(categorical.iter().map(|n| FeatureColumn::categorical(n.as_ref())))
            .collect();
        Self::new(columns)
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn categorical(&self) -> impl Iterator<Item = &FeatureColumn> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Categorical)
    }
}

/// Companion file of a model artifact, written by the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMetadata {
    pub num_features: Vec<String>,
    pub cat_features: Vec<String>,
    /// Training-time levels of each categorical column. A level's index is
    /// its encoded value.
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_transform: Option<TargetTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl FeatureMetadata {
    pub fn schema(&self) -> Result<FeatureSchema, SchemaLoadError> {
        FeatureSchema::from_groups(self.num_features.as_slice(), self.cat_features.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_columns_precede_categorical() {
        let schema = FeatureSchema::from_groups(&["a", "b"], &["c"]).unwrap();
        let names: Vec<&str> = schema.names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(schema.columns()[2].kind, ColumnKind::Categorical);
        assert_eq!(schema.position("b"), Some(1));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = FeatureSchema::from_groups(&["a"], &["a"]);
        assert!(matches!(
            result,
            Err(SchemaLoadError::DuplicateColumn { column }) if column == "a"
        ));
    }

    #[test]
    fn test_empty_schema_rejected() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            FeatureSchema::from_groups(&empty, &empty),
            Err(SchemaLoadError::EmptySchema)
        ));
    }

    #[test]
    fn test_metadata_parses_without_optional_keys() {
        let json = r#"{"num_features": ["year"], "cat_features": ["duration"]}"#;
        let metadata: FeatureMetadata = serde_json::from_str(json).unwrap();
        assert!(metadata.categories.is_empty());
        assert!(metadata.target_transform.is_none());
        assert_eq!(metadata.schema().unwrap().len(), 2);
    }
}
