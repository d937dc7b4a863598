use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] gatecfg_config::Error),

    #[error(transparent)]
    Edit(#[from] gatecfg_config::EditError),
}

pub type Result<T> = std::result::Result<T, Error>;
