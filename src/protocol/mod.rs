//! Quiz service wire protocol.

mod messages;

pub use messages::{
    GenerateForm, GenerateResponse, VerifyDetail, VerifyRequest, VerifyResponse, WireQuestion,
};
