//! Name and data-type checks applied at the edit boundary
//!
//! The transformation engine trusts its input; these checks run only when a
//! user edit enters the schema.

/// Maximum length for identifiers (MySQL standard)
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NameError {
    #[error("Name cannot be empty")]
    Empty,

    #[error("Name is too long ({actual} chars, max {max})")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Name contains invalid characters: '{}'. Only letters, numbers, and underscores are allowed",
        collect_chars(.invalid)
    )]
    InvalidCharacters { invalid: Vec<char> },

    #[error("Name cannot start with a digit")]
    StartsWithDigit,

    #[error("Data type cannot be empty")]
    EmptyDataType,
}

fn collect_chars(chars: &[char]) -> String {
    chars.iter().collect()
}

fn check_length(trimmed: &str) -> Result<(), NameError> {
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }
    let actual = trimmed.chars().count();
    if actual > MAX_IDENTIFIER_LENGTH {
        return Err(NameError::TooLong {
            max: MAX_IDENTIFIER_LENGTH,
            actual,
        });
    }
    Ok(())
}

/// Column names: ASCII letters, digits and underscores, not starting with a digit
pub fn validate_column_name(name: &str) -> Result<(), NameError> {
    let trimmed = name.trim();
    check_length(trimmed)?;

    let invalid: Vec<char> = trimmed
        .chars()
        .filter(|c| !c.is_ascii_alphanumeric() && *c != '_')
        .collect();
    if !invalid.is_empty() {
        return Err(NameError::InvalidCharacters { invalid });
    }

    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(NameError::StartsWithDigit);
    }

    Ok(())
}

/// Entity names may contain spaces ("Order Item"); inference folds them away
pub fn validate_entity_name(name: &str) -> Result<(), NameError> {
    let trimmed = name.trim();
    check_length(trimmed)?;

    let invalid: Vec<char> = trimmed.chars().filter(|c| c.is_control()).collect();
    if !invalid.is_empty() {
        return Err(NameError::InvalidCharacters { invalid });
    }

    Ok(())
}

/// Data types are free-form tags; only emptiness is rejected
pub fn validate_data_type(data_type: &str) -> Result<(), NameError> {
    if data_type.trim().is_empty() {
        Err(NameError::EmptyDataType)
    } else {
        Ok(())
    }
}
