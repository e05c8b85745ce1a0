//! File Operations for the Corpografo console
//!
//! Document upload goes through the native file dialog of the `rfd` crate.
//! The picked file is read whole; text extraction happens on the server.

use rfd::AsyncFileDialog;

/// Extensions offered first in the picker
pub const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "pdf", "docx", "odt", "html"];

/// Display name for the file filter
pub const FILE_TYPE_NAME: &str = "Documents";

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Open a file dialog and read the chosen document.
///
/// Returns `None` if the dialog was cancelled.
pub async fn pick_document() -> Option<PickedFile> {
    let file = AsyncFileDialog::new()
        .set_title("Upload document")
        .add_filter(FILE_TYPE_NAME, DOCUMENT_EXTENSIONS)
        .add_filter("All Files", &["*"])
        .pick_file()
        .await?;

    let name = file.file_name();
    let bytes = file.read().await;
    tracing::debug!(file = %name, bytes = bytes.len(), "Picked document");
    Some(PickedFile { name, bytes })
}

/// Human-readable size for the upload summary
pub fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let size = bytes as f64;
    if size < KIB {
        format!("{} B", bytes)
    } else if size < KIB * KIB {
        format!("{:.1} KiB", size / KIB)
    } else {
        format!("{:.1} MiB", size / (KIB * KIB))
    }
}

// ============================================================================
// Tests
// ============================================================================
