/// Figure "show" replacement: every open figure is sent as a framed JPEG
/// over the image descriptor instead of being displayed in a window.
use crate::config::config::FigureConfig;
use crate::config::types::Result;
use crate::figure::frame::write_frame;
use crate::figure::registry::{Figure, FigureRegistry};
use crate::utils::fd::open_for_writing;
use image::codecs::jpeg::JpegEncoder;
use std::io::Write;
use std::os::unix::io::RawFd;

/// Printed when a figure cannot be delivered
pub const SEND_FAILURE_MESSAGE: &str = "An error occurred while sending the image to your browser.";

/// Delivery counts of one `show` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShowSummary {
    pub sent: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone)]
pub struct FigureEmitter {
    image_fd: RawFd,
    quality: u8,
}

impl FigureEmitter {
    pub fn new(config: &FigureConfig) -> Self {
        Self {
            image_fd: config.image_fd,
            quality: config.jpeg_quality,
        }
    }

    /// Send every open figure. Delivery failures are reported, never returned.
    pub fn show(&self, registry: &mut FigureRegistry) -> ShowSummary {
        let mut summary = ShowSummary::default();

        for figure in registry.figures_mut() {
            if let Err(e) = figure.set_background_alpha(0) {
                log::debug!("Keeping opaque background: {}", e);
            }

            match self.send(figure) {
                Ok(bytes) => {
                    log::debug!(
                        "Sent figure {} ({} bytes) on fd {}",
                        figure.number(),
                        bytes,
                        self.image_fd
                    );
                    summary.sent += 1;
                }
                Err(e) => {
                    log::warn!("Failed to send figure {}: {}", figure.number(), e);
                    println!("{}", SEND_FAILURE_MESSAGE);
                    summary.dropped += 1;
                }
            }
        }

        summary
    }

    /// Encode and frame one figure onto the image descriptor
    fn send(&self, figure: &Figure) -> Result<usize> {
        let payload = encode_jpeg(figure, self.quality)?;
        let mut channel = open_for_writing(self.image_fd)?;
        self.send_to(&mut channel, &payload)?;
        Ok(payload.len())
    }

    fn send_to<W: Write>(&self, channel: &mut W, payload: &[u8]) -> Result<()> {
        write_frame(channel, payload)?;
        Ok(())
    }
}

/// Encode a figure as a JPEG. Alpha is discarded since JPEG cannot carry it.
pub fn encode_jpeg(figure: &Figure, quality: u8) -> Result<Vec<u8>> {
    let rgb = figure.canvas().to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality).encode_image(&rgb)?;
    Ok(buffer)
}
