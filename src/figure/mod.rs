//! Figure output shim
//!
//! Replaces "show the figure in a window" with "send the figure to the
//! browser": open figures are rendered to JPEG and written, framed by
//! literal markers, to descriptor 3.

pub mod emitter;
pub mod frame;
pub mod registry;

pub use emitter::{FigureEmitter, ShowSummary};
pub use frame::{FrameDecoder, END_MARKER, START_MARKER};
pub use registry::{Figure, FigureRegistry};
