pub type Result<T, E = ExcelError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ExcelError {
    #[error("Failed to load workbook: {0}")]
    Load(String),

    #[error("Sheet '{0}' not found in workbook")]
    SheetNotFound(String),
}

impl From<calamine::Error> for ExcelError {
    fn from(error: calamine::Error) -> Self {
        ExcelError::Load(error.to_string())
    }
}
