//! Typed column edits
//!
//! Every change the editor can make to a single column, as one tagged enum.
//! Edits are validated before they touch the entity and produce a new entity.

use super::validation::{NameError, validate_column_name, validate_data_type};
use super::{Column, Entity};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ColumnEdit {
    Rename {
        name: String,
    },
    Retype {
        #[serde(rename = "dataType")]
        data_type: String,
    },
    SetPrimaryKey {
        value: bool,
    },
    SetForeignKey {
        value: bool,
    },
    SetDescription {
        description: Option<String>,
    },
    SetSampleValue {
        #[serde(rename = "sampleValue")]
        sample_value: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("Column '{column_id}' not found in entity '{entity}'")]
    ColumnNotFound { entity: String, column_id: String },

    #[error("Invalid column: {0}")]
    Invalid(#[from] NameError),
}

impl ColumnEdit {
    /// Check the edit on its own, without looking at the target column
    pub fn validate(&self) -> Result<(), NameError> {
        match self {
            ColumnEdit::Rename { name } => validate_column_name(name),
            ColumnEdit::Retype { data_type } => validate_data_type(data_type),
            _ => Ok(()),
        }
    }

    fn apply_to(self, column: &mut Column) {
        match self {
            ColumnEdit::Rename { name } => column.name = name.trim().to_string(),
            ColumnEdit::Retype { data_type } => column.data_type = data_type.trim().to_string(),
            ColumnEdit::SetPrimaryKey { value } => column.is_primary_key = value,
            ColumnEdit::SetForeignKey { value } => column.is_foreign_key = value,
            ColumnEdit::SetDescription { description } => column.description = description,
            ColumnEdit::SetSampleValue { sample_value } => column.sample_value = sample_value,
        }
    }
}

/// Apply `edit` to the column `column_id` of `entity`, returning the edited copy
pub fn apply_column_edit(
    entity: &Entity,
    column_id: &str,
    edit: ColumnEdit,
) -> Result<Entity, EditError> {
    edit.validate()?;

    let (index, _) = entity
        .find_column(column_id)
        .ok_or_else(|| EditError::ColumnNotFound {
            entity: entity.name.clone(),
            column_id: column_id.to_string(),
        })?;

    let mut edited = entity.clone();
    edit.apply_to(&mut edited.columns[index]);
    Ok(edited)
}
