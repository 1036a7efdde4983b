use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FlattenError {
    #[error("Recipe nesting cycle detected at recipe {0}")]
    CycleDetected(Uuid),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConversionError {
    #[error("No conversion rule from '{from}' to '{to}'")]
    NoRuleFound { from: String, to: String },
}
