//! Error taxonomy for scene mutations.
//!
//! None of these errors leave the registry in a changed state: the attempted
//! operation is abandoned before any mutation happens.

use crate::doc::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("image resource not ready: {name}")]
    ResourceNotReady { name: String },
    #[error("no image selected")]
    NoImageSelected,
    #[error("unknown kind: {0}")]
    UnknownKind(String),
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),
    #[error("unknown image resource: {0}")]
    UnknownResource(String),
    #[error("no metadata record at index {0}")]
    MetadataIndexOutOfRange(usize),
    #[error("object {0} is not an image")]
    NotAnImage(ObjectId),
}

impl EditError {
    /// Stable machine-readable code for the host.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ResourceNotReady { .. } => "E_RESOURCE_NOT_READY",
            Self::NoImageSelected => "E_NO_IMAGE_SELECTED",
            Self::UnknownKind(_) => "E_UNKNOWN_KIND",
            Self::ObjectNotFound(_) => "E_OBJECT_NOT_FOUND",
            Self::UnknownResource(_) => "E_UNKNOWN_RESOURCE",
            Self::MetadataIndexOutOfRange(_) => "E_METADATA_INDEX",
            Self::NotAnImage(_) => "E_NOT_AN_IMAGE",
        }
    }

    /// Text shown to the user in a blocking notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ResourceNotReady { name } => format!("Image \"{name}\" is not ready yet, please wait a moment"),
            Self::NoImageSelected => "Please choose an uploaded image first".to_owned(),
            other => other.to_string(),
        }
    }
}
