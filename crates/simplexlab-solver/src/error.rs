use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimplexError {
    #[error("Invalid dimension in {context}: expected {expected} entries, found {found}")]
    InvalidDimension {
        context: String,
        expected: usize,
        found: usize,
    },
    #[error("Problem has no decision variables")]
    EmptyProblem,
}

impl SimplexError {
    pub(crate) fn dimension(context: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::InvalidDimension {
            context: context.into(),
            expected,
            found,
        }
    }
}
