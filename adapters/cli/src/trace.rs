//! JSON-lines frame trace sink.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use brawl_core::FrameSnapshot;

/// Writes one JSON document per frame.
#[derive(Debug)]
pub(crate) struct TraceWriter<W: Write> {
    out: W,
    frames: u32,
}

impl TraceWriter<BufWriter<File>> {
    /// Creates (or truncates) the trace file at `path`.
    pub(crate) fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create trace {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> TraceWriter<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    /// Appends `snapshot` as a single line.
    pub(crate) fn write(&mut self, snapshot: &FrameSnapshot) -> Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)
            .with_context(|| format!("failed to encode frame {}", snapshot.frame))?;
        self.out
            .write_all(b"\n")
            .context("failed to write trace line")?;
        self.frames += 1;
        Ok(())
    }

    /// Flushes buffered frames and returns how many were written.
    pub(crate) fn finish(mut self) -> Result<u32> {
        self.out.flush().context("failed to flush trace")?;
        Ok(self.frames)
    }
}
