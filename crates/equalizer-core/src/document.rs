/// A single user-supplied file, as handed to ingestion and the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub name: String,
    /// MIME type, e.g. `application/pdf`.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}
