use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not access system clipboard, error: {source}"))]
    AccessClipboard { source: crate::backend::Error },

    #[snafu(display("Could not persist clip history, error: {source}"))]
    PersistHistory { source: crate::history::Error },
}
