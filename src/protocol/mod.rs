pub mod control;
pub mod results;

pub use control::{no_op_message, start_message, stop_message};
pub use results::{
    decode_event, decode_recognize_response, Alternative, DecodeError, InboundMessage,
    KeywordSpot, RecognitionEvent, RecognitionResult,
};
