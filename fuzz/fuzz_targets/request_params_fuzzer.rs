//! Fuzz target for request construction and authorization
//!
//! Builds requests from arbitrary parameter sets to find:
//! - Panics in parameter lookup, URL parsing, or base64 decoding
//! - Panics in recipe parsing or the authorization gates
//!
//! The fuzzer should NEVER panic. Invalid requests should return an
//! error before any authorization decision is made.

#![no_main]

use arbitrary::Arbitrary;
use dicevault_api::{ApiRequest, AuthTokenStore, RequestParameters};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    pairs: Vec<(String, String)>,
}

fuzz_target!(|input: FuzzInput| {
    let parameters = RequestParameters::from_pairs(input.pairs);
    let tokens = AuthTokenStore::new();

    // Construction and authorization must never panic, only reject.
    if let Ok(request) = ApiRequest::from_parameters(&parameters, &tokens) {
        let _ = request.authorize();
    }
});
