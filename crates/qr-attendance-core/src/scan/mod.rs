mod clock;
mod decode_loop;
mod event;

pub use {
    clock::{Clock, TokioClock},
    decode_loop::DecodeLoop,
    event::{LoopExit, ScanEvent},
};
