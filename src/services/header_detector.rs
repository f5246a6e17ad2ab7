//! Common header detection
//!
//! Counts how many request records carry each header name. Headers seen on a
//! large share of requests are reported as common (implicit boilerplate rather
//! than endpoint-specific); near-universal ones are also flagged required.

use std::collections::{HashMap, HashSet};

use crate::domain::{CommonHeader, TrafficRecord};

/// Minimum share of requests for a header to count as common
pub const COMMON_HEADER_THRESHOLD: f64 = 0.4;

/// Minimum share of requests for a common header to count as required
pub const REQUIRED_HEADER_THRESHOLD: f64 = 0.9;

struct HeaderTally {
    name: String,
    example: String,
    occurrences: usize,
}

/// Detect headers common to the captured requests, in first-seen order
pub fn detect_common_headers(records: &[TrafficRecord]) -> Vec<CommonHeader> {
    let mut tallies: Vec<HeaderTally> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut request_count = 0usize;

    for record in records.iter().filter(|r| r.is_request()) {
        request_count += 1;
        let mut seen_in_record: HashSet<String> = HashSet::new();

        for (name, value) in record.headers.iter() {
            let key = name.to_ascii_lowercase();
            // A header repeated within one request counts once
            if !seen_in_record.insert(key.clone()) {
                continue;
            }
            let slot = *index.entry(key).or_insert_with(|| {
                tallies.push(HeaderTally {
                    name: name.to_string(),
                    example: value.to_string(),
                    occurrences: 0,
                });
                tallies.len() - 1
            });
            tallies[slot].occurrences += 1;
        }
    }

    if request_count == 0 {
        return Vec::new();
    }

    tallies
        .into_iter()
        .filter_map(|tally| {
            let frequency = tally.occurrences as f64 / request_count as f64;
            (frequency >= COMMON_HEADER_THRESHOLD).then(|| CommonHeader {
                name: tally.name,
                occurrences: tally.occurrences,
                frequency,
                required: frequency >= REQUIRED_HEADER_THRESHOLD,
                example: Some(tally.example),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requests_with_header(total: usize, with_header: usize) -> Vec<TrafficRecord> {
        (0..total)
            .map(|n| {
                let record = TrafficRecord::request(n.to_string(), "GET", "/items");
                if n < with_header {
                    record.with_header("X-Trace-Id", format!("trace-{}", n))
                } else {
                    record
                }
            })
            .collect()
    }

    #[test]
    fn test_nine_of_ten_is_common_and_required() {
        let headers = detect_common_headers(&requests_with_header(10, 9));
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].name, "X-Trace-Id");
        assert_eq!(headers[0].occurrences, 9);
        assert!(headers[0].required);
    }

    #[test]
    fn test_four_of_ten_is_common_only() {
        let headers = detect_common_headers(&requests_with_header(10, 4));
        assert_eq!(headers.len(), 1);
        assert!(!headers[0].required);
        assert!((headers[0].frequency - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_one_of_ten_is_neither() {
        assert!(detect_common_headers(&requests_with_header(10, 1)).is_empty());
    }

    #[test]
    fn test_case_variants_counted_together() {
        let records = vec![
            TrafficRecord::request("1", "GET", "/a").with_header("X-Tenant", "a"),
            TrafficRecord::request("2", "GET", "/b").with_header("x-tenant", "b"),
        ];
        let headers = detect_common_headers(&records);
        assert_eq!(headers[0].name, "X-Tenant");
        assert_eq!(headers[0].occurrences, 2);
        assert_eq!(headers[0].example.as_deref(), Some("a"));
    }

    #[test]
    fn test_repeated_header_counts_once_per_request() {
        let records = vec![
            TrafficRecord::request("1", "GET", "/a")
                .with_header("Accept", "text/html")
                .with_header("Accept", "application/json"),
            TrafficRecord::request("2", "GET", "/b"),
        ];
        let headers = detect_common_headers(&records);
        assert_eq!(headers[0].occurrences, 1);
        assert!((headers[0].frequency - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_requests() {
        let records = vec![TrafficRecord::response("1", 200).with_header("Server", "nginx")];
        assert!(detect_common_headers(&records).is_empty());
    }
}
