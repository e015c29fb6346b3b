//! Flattening feed records into a deduplicated address set.

use std::collections::HashSet;

use iplsync_core::{AddressEntry, EndpointRecord};

/// Collect every IP literal from `records`, dropping repeats.
///
/// Output order is first occurrence: records in input order, IPs within a
/// record in input order. Comparison is exact string equality; no CIDR or
/// case normalisation is done.
pub fn extract_addresses(records: &[EndpointRecord]) -> Vec<AddressEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries = Vec::new();
    for ip in records.iter().flat_map(|r| r.ips.iter()) {
        if seen.insert(ip.as_str()) {
            entries.push(AddressEntry::from(ip.as_str()));
        }
    }
    entries
}
