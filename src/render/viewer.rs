/// The overlay currently shown on top of the directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Viewer {
    #[default]
    Closed,
    Image {
        src: String,
    },
    Document {
        title: String,
        href: String,
    },
}

impl Viewer {
    pub fn is_document_open(&self) -> bool {
        matches!(self, Viewer::Document { .. })
    }

    /// Opens the full-size image preview. Ignored while a document is open.
    pub fn open_image(&mut self, src: &str) -> bool {
        if self.is_document_open() {
            return false;
        }
        *self = Viewer::Image {
            src: src.to_string(),
        };
        true
    }

    /// Opens a document, closing any image preview first.
    pub fn open_document(&mut self, title: &str, href: &str) {
        *self = Viewer::Document {
            title: title.to_string(),
            href: href.to_string(),
        };
    }

    pub fn close(&mut self) {
        *self = Viewer::Closed;
    }
}
