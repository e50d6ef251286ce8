/// Errors surfaced at the edges of the library. Sampling failures (zero
/// density, missed geometry, roulette termination) are not errors; they
/// contribute zero radiance and stay silent.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
