// ABOUTME: Minimal request-cookie extraction for the session token
// ABOUTME: Parses the Cookie header without pulling in a full cookie jar
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

use http::HeaderMap;

/// Extract a cookie value by name from request headers
///
/// Multiple `Cookie` headers are searched in order; the first match wins.
#[must_use]
pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name).then(|| value.trim().to_owned())
        })
        .next()
}
