// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scoped preview resources for the uploaded original.
//
// A preview handle stands for a live reference to the original's bytes (an
// object URL in a browser, a temp file on a desktop). The registry counts what
// is live; each handle releases itself exactly once, on drop.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use redline_core::types::{DocumentOrigin, OriginFormat};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

/// How the original is shown next to the annotated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PreviewKind {
    /// Embedded PDF viewer.
    PdfFrame,
    /// Embedded object with a download fallback.
    WordObject,
    /// No inline preview, download link only.
    DownloadOnly,
}

impl PreviewKind {
    pub fn for_origin(format: OriginFormat) -> Self {
        match format {
            OriginFormat::Pdf => Self::PdfFrame,
            OriginFormat::WordProcessor(_) => Self::WordObject,
            OriginFormat::PlainText | OriginFormat::Other => Self::DownloadOnly,
        }
    }
}

/// Issues preview handles and tracks which are still live.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<Mutex<HashSet<Uuid>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a preview for `origin` backed by `bytes`.
    pub fn acquire(&self, origin: &DocumentOrigin, bytes: Arc<[u8]>) -> PreviewHandle {
        let id = Uuid::new_v4();
        if let Ok(mut live) = self.live.lock() {
            live.insert(id);
        }
        let kind = PreviewKind::for_origin(origin.format);
        // The declared type wins; otherwise the one implied by the format.
        let mime_type = origin
            .mime_type
            .clone()
            .filter(|mime| !mime.trim().is_empty())
            .unwrap_or_else(|| origin.format.mime_type().to_owned());
        debug!(%id, ?kind, %mime_type, file = %origin.file_name, "preview acquired");
        PreviewHandle {
            id,
            kind,
            file_name: origin.file_name.clone(),
            mime_type,
            bytes,
            live: Arc::clone(&self.live),
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().map(|live| live.len()).unwrap_or(0)
    }

    pub fn is_live(&self, id: Uuid) -> bool {
        self.live.lock().is_ok_and(|live| live.contains(&id))
    }
}

/// A live preview. Released when dropped.
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    kind: PreviewKind,
    file_name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
    live: Arc<Mutex<HashSet<Uuid>>>,
}

impl PreviewHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> PreviewKind {
        self.kind
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Content type the preview is served with.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        match self.live.lock() {
            Ok(mut live) => {
                if live.remove(&self.id) {
                    debug!(id = %self.id, "preview released");
                }
            }
            Err(_) => warn!(id = %self.id, "preview registry poisoned, release skipped"),
        }
    }
}

/// The single preview slot of a session. Replacing or clearing it releases
/// the previous handle.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    current: Option<PreviewHandle>,
}

impl PreviewSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&PreviewHandle> {
        self.current.as_ref()
    }

    pub fn replace(&mut self, handle: PreviewHandle) {
        self.current = Some(handle);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
