/*
 * Copyright (C) 2025 Jakub Žitník
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 */

//! Byte-level body rewriting: literal, non-overlapping, left-to-right,
//! whole-buffer substitution of one origin string for another.

use bytes::Bytes;

/// Replaces every non-overlapping occurrence of `from` with `to` in `body`.
/// A no-op (returns `body` unchanged, without copying) when `from == to` or
/// `from` is empty — matching the design's "skip work when exposed≡target"
/// rule and avoiding an infinite/undefined replace-the-empty-string case.
pub fn rewrite_body(body: &Bytes, from: &str, to: &str) -> Bytes {
    if from.is_empty() || from == to || !contains(body, from.as_bytes()) {
        return body.clone();
    }
    Bytes::from(replace_all(body, from.as_bytes(), to.as_bytes()))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    find(haystack, needle, 0).is_some()
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut pos = 0;
    while let Some(start) = find(haystack, needle, pos) {
        out.extend_from_slice(&haystack[pos..start]);
        out.extend_from_slice(replacement);
        pos = start + needle.len();
    }
    out.extend_from_slice(&haystack[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_when_origin_absent() {
        let body = Bytes::from_static(b"nothing interesting here");
        let out = rewrite_body(&body, "https://target.internal", "https://example.com/foo");
        assert_eq!(out, body);
    }

    #[test]
    fn identity_when_from_equals_to() {
        let body = Bytes::from_static(b"https://example.com/x");
        let out = rewrite_body(&body, "https://example.com", "https://example.com");
        assert_eq!(out, body);
    }

    #[test]
    fn replaces_all_non_overlapping_occurrences() {
        let body = Bytes::from_static(b"see https://T/a and https://T/b again");
        let out = rewrite_body(&body, "https://T", "https://example.com/foo");
        assert_eq!(
            out,
            Bytes::from_static(b"see https://example.com/foo/a and https://example.com/foo/b again")
        );
    }

    #[test]
    fn round_trip_recovers_original_body() {
        let original = Bytes::from_static(
            b"some random content containing the request URL and path prefix https://T/bar but also other stuff",
        );
        let outbound = rewrite_body(&original, "https://example.com/foo", "https://T");
        let inbound = rewrite_body(&outbound, "https://T", "https://example.com/foo");
        assert_eq!(inbound, original);
    }

    #[test]
    fn empty_from_is_a_no_op() {
        let body = Bytes::from_static(b"abc");
        let out = rewrite_body(&body, "", "xyz");
        assert_eq!(out, body);
    }
}
