//! Transport-facing protocol plumbing.

mod framing;

pub use framing::{
    write_frame, FrameBuffer, FrameReader, FrameWriter, HEADER_LEN, MAX_FRAME_LEN,
};
