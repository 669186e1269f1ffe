/// Image framing protocol on the figure channel
///
/// A frame is the literal start marker, the encoded image, and the literal
/// end marker. There is no length prefix; readers scan for the end marker.
use std::io::Write;

/// Start marker. The misspelling is part of the wire contract.
pub const START_MARKER: &[u8] = b"STARTIMGAGE";
/// End marker
pub const END_MARKER: &[u8] = b"ENDIMAGE";

/// Write one frame, flushing after each part, as the reader expects
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> std::io::Result<()> {
    writer.write_all(START_MARKER)?;
    writer.flush()?;
    writer.write_all(payload)?;
    writer.flush()?;
    writer.write_all(END_MARKER)?;
    writer.flush()
}

/// Incremental reader side of the protocol
///
/// Chunks may split markers or payloads anywhere. Bytes outside a frame
/// are dropped.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    in_frame: bool,
    scanned: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, returning every payload completed by it
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();

        loop {
            let marker = if self.in_frame { END_MARKER } else { START_MARKER };
            match find(&self.buffer[self.scanned..], marker) {
                Some(offset) => {
                    let position = self.scanned + offset;
                    if self.in_frame {
                        frames.push(self.buffer[..position].to_vec());
                    }
                    self.buffer.drain(..position + marker.len());
                    self.in_frame = !self.in_frame;
                    self.scanned = 0;
                }
                None => {
                    // A marker prefix may still be completed by the next chunk.
                    let keep = marker.len() - 1;
                    let boundary = self.buffer.len().saturating_sub(keep);
                    if self.in_frame {
                        self.scanned = boundary;
                    } else {
                        self.buffer.drain(..boundary);
                        self.scanned = 0;
                    }
                    break;
                }
            }
        }

        frames
    }

    /// True while a start marker has been seen without its end marker
    pub fn in_frame(&self) -> bool {
        self.in_frame
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}
