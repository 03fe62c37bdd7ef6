//! XML-RPC wire codec.
//!
//! Pure translation between [`Value`] and the tagged XML text the ERP speaks.
//! No I/O happens here; the client hands envelopes to relay strategies.

pub mod decode;
pub mod encode;
pub mod envelope;
pub mod value;

pub use decode::{DecodeMode, decode, decode_fragment};
pub use encode::{encode, escape_text};
pub use envelope::{Fault, FaultCode, Response, build_envelope, parse_envelope};
pub use value::Value;
