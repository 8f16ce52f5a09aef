use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write error: {0}")]
    Write(#[from] std::io::Error),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("xml attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("malformed svg: {0}")]
    Svg(String),

    #[error("svg root has no usable '{attribute}' dimension (found {value:?})")]
    Dimension {
        attribute: &'static str,
        value: Option<String>,
    },

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| AssetError::Io { path, source }
    }
}
