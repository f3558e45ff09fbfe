//! JSON export.

use std::io::Write;

use log::{debug, error};

use crate::{
    export::{self, Exporter},
    layout::Layout,
};

/// Writes a [`Layout`] as pretty-printed JSON.
///
/// The output lists nodes with top-left positions and edges with their
/// anchors and polylines, using snake_case field names.
pub struct JsonExporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonExporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Exporter for JsonExporter<W> {
    fn export_layout(&mut self, layout: &Layout) -> Result<(), export::Error> {
        serde_json::to_writer_pretty(&mut self.writer, layout).map_err(|err| {
            error!(err:err; "Failed to serialize layout");
            export::Error::Json(err)
        })?;
        writeln!(self.writer)?;
        self.writer.flush()?;

        debug!(nodes = layout.nodes().len(); "Layout written as JSON");
        Ok(())
    }
}
