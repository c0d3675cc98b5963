//! Outer protobuf envelope
//!
//! On-chain transaction blobs are a one-field protobuf message whose
//! `data` field carries the binary-encoded transaction.

/// The outer envelope around a wire-encoded transaction.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TxEnvelope {
    #[prost(bytes = "vec", tag = "1")]
    pub data: ::prost::alloc::vec::Vec<u8>,
}
