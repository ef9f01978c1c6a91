use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MenuError {
    #[error("対象期間の指定が不正です: {0}")]
    InvalidSelection(String),
}
