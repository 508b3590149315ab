use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("symbol size must be between 2 and 16, got {0}")]
    SymbolSize(usize),
    #[error("field polynomial {poly:#x} does not generate GF(2^{symsize})")]
    FieldPoly { poly: usize, symsize: usize },
    #[error("invalid Reed-Solomon parameters: {0}")]
    RsParams(&'static str),
    #[error("code geometry rejected: {0}")]
    Geometry(String),
    #[error("unknown random number generator '{0}'")]
    UnknownRng(String),
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
