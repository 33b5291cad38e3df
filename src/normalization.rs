// src/normalization.rs
//
// Key-normalization utilities shared by every entry point that addresses
// prefixes or routers. The store keys prefixes by their CIDR with `/`
// replaced by `_` (key-safety), and several legacy request shapes address
// the same record differently: raw CIDR, pre-normalized key, short-host
// alias, or a graph-relative key derived from a LinkEdge. All of them
// funnel through here so the matching logic in the updater/resolver never
// duplicates inline normalization.

use std::collections::HashMap;

use crate::schema::{PREFIXES, ROUTERS};

/// Normalize a prefix representation into its store key:
/// `10.0.0.0/24` -> `10.0.0.0_24`. Already-normalized keys pass through.
pub fn prefix_key(raw: &str) -> String {
    raw.replace('/', "_")
}

/// Full prefix document id: `Prefixes/<normalized key>`.
pub fn prefix_doc_id(raw: &str) -> String {
    format!("{}/{}", PREFIXES, prefix_key(raw))
}

/// Full router document id: `Routers/<key>`.
pub fn router_doc_id(key: &str) -> String {
    format!("{}/{}", ROUTERS, key)
}

/// Replace `/` with `_` in a document id, producing the key-safe form used
/// inside composite PrefixEdge keys (`Routers/r3` -> `Routers_r3`).
pub fn sanitize_doc_id(id: &str) -> String {
    id.replace('/', "_")
}

/// Graph-relative PrefixEdge key: given the `to` document id of a LinkEdge
/// leaving the addressed interface and the destination prefix, derive the
/// composite key `<sanitized link to>_Prefixes_<prefix key>`.
pub fn derived_prefix_edge_key(link_to: &str, to_prefix: &str) -> String {
    format!("{}_{}_{}", sanitize_doc_id(link_to), PREFIXES, prefix_key(to_prefix))
}

/// Normalize a host identifier into a prefix key: apply the host-to-prefix
/// alias table first, then normalize any CIDR slash, then append the
/// default `_<masklen>` suffix when the value does not already end in a
/// mask-length token.
pub fn host_prefix_key(
    host: &str,
    aliases: &HashMap<String, String>,
    default_masklen: u8,
) -> String {
    let aliased = aliases.get(host).map(String::as_str).unwrap_or(host);
    let key = prefix_key(aliased);
    if has_masklen_suffix(&key) {
        key
    } else {
        format!("{}_{}", key, default_masklen)
    }
}

/// Rewrite a legacy source identifier to its canonical router key. The
/// rewrite table is deployment configuration (see `Settings::aliases`);
/// identifiers without an entry pass through unchanged.
pub fn canonical_source(source: &str, rewrites: &HashMap<String, String>) -> String {
    rewrites
        .get(source)
        .cloned()
        .unwrap_or_else(|| source.to_string())
}

// A key like `10.0.0.0_24` ends in a `_<len>` token with len <= 128
// (v6 masks included). Interface-style hosts (`10.11.0.1`) do not.
fn has_masklen_suffix(key: &str) -> bool {
    match key.rsplit_once('_') {
        Some((_, last)) => last.parse::<u8>().map(|len| len <= 128).unwrap_or(false),
        None => false,
    }
}
