use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  #[error("upper limit must be at least 1")]
  InvalidArgument,
  #[error("index {index} out of range 1..={len}")]
  IndexOutOfRange { index: usize, len: usize },
}
