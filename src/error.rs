use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    #[error("self-loop on vertex {0}")]
    SelfLoop(usize),
    #[error("vertex {vertex} is out of range for a graph on {n} vertices")]
    VertexOutOfRange { vertex: usize, n: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
    #[error("edge ({0}, {1}) already exists")]
    EdgeAlreadyExists(usize, usize),
    #[error("edge ({0}, {1}) not found")]
    EdgeNotFound(usize, usize),
    /// Internal consistency failure. The structure must not be used afterwards.
    #[error("invariant violated: {0}")]
    InvariantViolation(&'static str),
}

/// Rejects self-loops and vertices outside `0..n`, in that order.
pub(crate) fn check_pair(u: usize, v: usize, n: usize) -> Result<()> {
    if u == v {
        return Err(InvalidArgument::SelfLoop(u).into());
    }
    for vertex in [u, v] {
        if vertex >= n {
            return Err(InvalidArgument::VertexOutOfRange { vertex, n }.into());
        }
    }
    Ok(())
}

pub(crate) fn check_vertex(vertex: usize, n: usize) -> Result<()> {
    if vertex >= n {
        Err(InvalidArgument::VertexOutOfRange { vertex, n }.into())
    } else {
        Ok(())
    }
}
