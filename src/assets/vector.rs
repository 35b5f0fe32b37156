use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::foundation::error::{OverlayError, OverlayResult};

/// Parsed vector image.
#[derive(Clone)]
pub struct VectorDocument {
    source: String,
    tree: Arc<usvg::Tree>,
}

impl std::fmt::Debug for VectorDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorDocument")
            .field("source", &self.source)
            .field("size", &self.size())
            .finish()
    }
}

impl VectorDocument {
    /// Parse SVG bytes. `source` names the document in errors and display lists.
    pub fn from_data(
        source: impl Into<String>,
        bytes: &[u8],
        resources_dir: Option<PathBuf>,
    ) -> OverlayResult<Self> {
        let source = source.into();
        let opts = usvg::Options {
            resources_dir,
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(bytes, &opts)
            .map_err(|e| OverlayError::load(format!("parse vector document '{source}': {e}")))?;
        Ok(Self {
            source,
            tree: Arc::new(tree),
        })
    }

    /// Name the document was loaded under.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parsed tree.
    pub fn tree(&self) -> &usvg::Tree {
        &self.tree
    }

    /// Natural `(width, height)` in pixels.
    pub fn size(&self) -> (f64, f64) {
        let size = self.tree.size();
        (f64::from(size.width()), f64::from(size.height()))
    }
}

/// Lazily populated cache of vector documents keyed by their source path.
///
/// A document is read and parsed the first time it is referenced and kept for the lifetime of
/// the library.
#[derive(Debug)]
pub struct VectorLibrary {
    root: PathBuf,
    docs: HashMap<String, Arc<VectorDocument>>,
}

impl VectorLibrary {
    /// Library resolving relative sources against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            docs: HashMap::new(),
        }
    }

    /// Directory relative sources are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Register an already parsed document under its source name.
    pub fn insert(&mut self, doc: VectorDocument) {
        self.docs.insert(doc.source.clone(), Arc::new(doc));
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Return `true` when nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Return the cached document for `source`, loading it on first use.
    pub fn get_or_load(&mut self, source: &str) -> OverlayResult<Arc<VectorDocument>> {
        if let Some(doc) = self.docs.get(source) {
            return Ok(doc.clone());
        }

        let path = self.root.join(Path::new(source));
        tracing::debug!(path = %path.display(), "loading vector document");
        let bytes = std::fs::read(&path).map_err(|e| {
            OverlayError::load(format!(
                "read vector document '{}': {e}",
                path.display()
            ))
        })?;
        let resources_dir = path.parent().map(Path::to_path_buf);
        let doc = Arc::new(VectorDocument::from_data(source, &bytes, resources_dir)?);
        self.docs.insert(source.to_string(), doc.clone());
        Ok(doc)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/vector.rs"]
mod tests;
