pub mod message;
pub mod response;

pub use message::{resolve, resolve_code, MessageCode, ResolvedMessage};
pub use response::{
    error, error_raw, success, success_message, success_paginated, ErrorBody, SuccessBody,
};
