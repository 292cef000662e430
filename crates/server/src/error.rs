use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not load clip history, error: {source}"))]
    LoadHistory { source: crate::service::Error },

    #[snafu(display("Could not enforce clip history capacity, error: {source}"))]
    EnforceHistoryCapacity { source: crate::service::Error },
}
