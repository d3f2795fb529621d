//! Uploaded image resources and the user's current choice among them.
//!
//! An upload enters the palette as `Pending` the moment decoding starts and
//! becomes `Loaded` when the decoder reports its natural size. Placement and
//! image swaps only accept loaded resources.
//!
//! Placed objects hold their own `Arc<LoadedImage>`, so removing a palette
//! entry never invalidates an object that already uses it.

#[cfg(test)]
#[path = "palette_test.rs"]
mod palette_test;

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::doc::{CUSTOM_IMAGE, Size};
use crate::error::EditError;

/// Decode status of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResourceStatus {
    Pending,
    Loaded { natural: Size },
}

/// A decoded image, shared by the palette and every object displaying it.
#[derive(Debug, PartialEq)]
pub struct LoadedImage {
    /// Process-unique resource key.
    pub key: String,
    /// Original file name.
    pub name: String,
    pub natural: Size,
    /// Raw file bytes.
    pub data: Arc<[u8]>,
}

/// One palette entry.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub key: String,
    pub name: String,
    pub data: Arc<[u8]>,
    pub status: ResourceStatus,
    loaded: Option<Arc<LoadedImage>>,
}

impl UploadedImage {
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// The decoded resource.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotReady` while decoding is still in flight.
    pub fn loaded(&self) -> Result<Arc<LoadedImage>, EditError> {
        self.loaded
            .clone()
            .ok_or_else(|| EditError::ResourceNotReady { name: self.name.clone() })
    }
}

/// Palette summary for the host's preview strip.
#[derive(Debug, Clone, Serialize)]
pub struct PaletteItem {
    pub key: String,
    pub name: String,
    #[serde(flatten)]
    pub status: ResourceStatus,
    pub chosen: bool,
}

/// Uploaded images, in upload order, plus the chosen one.
#[derive(Debug, Default)]
pub struct ImagePalette {
    entries: Vec<UploadedImage>,
    chosen: Option<String>,
}

impl ImagePalette {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an upload whose decode has just started. Returns its key.
    pub fn begin(&mut self, name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> String {
        let key = format!("{CUSTOM_IMAGE}-{}", Uuid::new_v4().simple());
        self.entries.push(UploadedImage {
            key: key.clone(),
            name: name.into(),
            data: data.into(),
            status: ResourceStatus::Pending,
            loaded: None,
        });
        key
    }

    /// Mark a pending upload as decoded.
    ///
    /// # Errors
    ///
    /// Returns `UnknownResource` if the key was never registered or has been removed.
    pub fn finish(&mut self, key: &str, natural: Size) -> Result<&UploadedImage, EditError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.key == key)
            .ok_or_else(|| EditError::UnknownResource(key.to_owned()))?;
        entry.status = ResourceStatus::Loaded { natural };
        entry.loaded = Some(Arc::new(LoadedImage {
            key: entry.key.clone(),
            name: entry.name.clone(),
            natural,
            data: Arc::clone(&entry.data),
        }));
        Ok(entry)
    }

    /// Drop an entry. Clears the choice if it pointed at this entry.
    pub fn remove(&mut self, key: &str) -> Option<UploadedImage> {
        let index = self.entries.iter().position(|e| e.key == key)?;
        if self.chosen.as_deref() == Some(key) {
            self.chosen = None;
        }
        Some(self.entries.remove(index))
    }

    /// Make `key` the image used by the custom-image tool.
    ///
    /// # Errors
    ///
    /// Returns `UnknownResource` if the key is not in the palette.
    pub fn choose(&mut self, key: &str) -> Result<(), EditError> {
        if self.get(key).is_none() {
            return Err(EditError::UnknownResource(key.to_owned()));
        }
        self.chosen = Some(key.to_owned());
        Ok(())
    }

    /// The chosen entry, if any.
    #[must_use]
    pub fn chosen(&self) -> Option<&UploadedImage> {
        self.chosen.as_deref().and_then(|k| self.get(k))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&UploadedImage> {
        self.entries.iter().find(|e| e.key == key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UploadedImage> {
        self.entries.iter()
    }

    #[must_use]
    pub fn items(&self) -> Vec<PaletteItem> {
        self.entries
            .iter()
            .map(|e| PaletteItem {
                key: e.key.clone(),
                name: e.name.clone(),
                status: e.status,
                chosen: self.chosen.as_deref() == Some(e.key.as_str()),
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
