use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::log_store::LogStore;
use crate::types::ProviderStats;

pub const DEFAULT_FAILURE_THRESHOLD: u32 = 50;
pub const DEFAULT_MIN_REQUESTS: u32 = 10;

#[derive(Debug, Default)]
struct Tally {
    total: u64,
    successful: u64,
    last_hour: u64,
    last_24_hours: u64,
    response_time_sum: u64,
    response_count: u64,
}

impl Tally {
    fn finish(&self, provider: &str) -> ProviderStats {
        ProviderStats {
            provider: provider.to_string(),
            total: saturate(self.total),
            successful: saturate(self.successful),
            failed: saturate(self.total - self.successful),
            success_rate: saturate(rounded_ratio(self.successful * 100, self.total)),
            avg_response_time_ms: saturate(rounded_ratio(
                self.response_time_sum,
                self.response_count,
            )),
            last_hour: saturate(self.last_hour),
            last_24_hours: saturate(self.last_24_hours),
        }
    }
}

pub fn provider_stats(store: &LogStore, provider: Option<&str>) -> Vec<ProviderStats> {
    provider_stats_at(store, provider, Utc::now())
}

/// Stats for every provider with at least one stored entry, in order of first
/// appearance. The hour and day windows end at `now`.
pub fn provider_stats_at(
    store: &LogStore,
    provider: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<ProviderStats> {
    let one_hour_ago = now - Duration::hours(1);
    let one_day_ago = now - Duration::hours(24);

    store.read(|records| {
        let mut order: Vec<&str> = Vec::new();
        let mut tallies: HashMap<&str, Tally> = HashMap::new();

        for record in records {
            let log = &record.log;
            if let Some(filter) = provider
                && log.provider != filter
            {
                continue;
            }

            let tally = tallies.entry(log.provider.as_str()).or_insert_with(|| {
                order.push(log.provider.as_str());
                Tally::default()
            });

            tally.total += 1;
            if log.success {
                tally.successful += 1;
            }
            if record.received_at > one_hour_ago {
                tally.last_hour += 1;
            }
            if record.received_at > one_day_ago {
                tally.last_24_hours += 1;
            }
            // Averaged across every target result, not per entry.
            for result in &log.results {
                tally.response_time_sum += u64::from(result.response_time_ms);
                tally.response_count += 1;
            }
        }

        order
            .into_iter()
            .filter_map(|name| tallies.get(name).map(|tally| tally.finish(name)))
            .collect()
    })
}

pub fn failure_alerts(store: &LogStore, failure_threshold: u32, min_requests: u32) -> Vec<String> {
    failure_alerts_at(store, failure_threshold, min_requests, Utc::now())
}

pub fn failure_alerts_at(
    store: &LogStore,
    failure_threshold: u32,
    min_requests: u32,
    now: DateTime<Utc>,
) -> Vec<String> {
    alerts_for(
        &provider_stats_at(store, None, now),
        failure_threshold,
        min_requests,
    )
}

/// One message per provider that saw at least `min_requests` in the last hour
/// and whose success rate is below `failure_threshold`.
pub fn alerts_for(stats: &[ProviderStats], failure_threshold: u32, min_requests: u32) -> Vec<String> {
    stats
        .iter()
        .filter(|stat| stat.last_hour >= min_requests && stat.success_rate < failure_threshold)
        .map(|stat| {
            format!(
                "{}: {}% success rate ({}/{} failed)",
                stat.provider, stat.success_rate, stat.failed, stat.total
            )
        })
        .collect()
}

/// `numerator / denominator` rounded half up; 0 when the denominator is 0.
fn rounded_ratio(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    (numerator * 2 + denominator) / (denominator * 2)
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ForwardResult, NewWebhookLog};

    fn result(response_time_ms: u32, success: bool) -> ForwardResult {
        ForwardResult {
            url: "https://example.com/hook".to_string(),
            status: if success { 200 } else { 500 },
            success,
            error: (!success).then(|| "HTTP 500: Internal Server Error".to_string()),
            response_time_ms,
        }
    }

    fn entry(provider: &str, success: bool, results: Vec<ForwardResult>) -> NewWebhookLog {
        NewWebhookLog {
            provider: provider.to_string(),
            payload: None,
            results,
            success,
            error: None,
        }
    }

    fn stats(
        provider: &str,
        total: u32,
        successful: u32,
        last_hour: u32,
        success_rate: u32,
    ) -> ProviderStats {
        ProviderStats {
            provider: provider.to_string(),
            total,
            successful,
            failed: total - successful,
            success_rate,
            avg_response_time_ms: 0,
            last_hour,
            last_24_hours: last_hour,
        }
    }

    #[test]
    fn rounded_ratio_rounds_half_up_and_guards_zero() {
        assert_eq!(rounded_ratio(0, 0), 0);
        assert_eq!(rounded_ratio(100, 3), 33);
        assert_eq!(rounded_ratio(200, 3), 67);
        assert_eq!(rounded_ratio(5, 2), 3);
    }

    #[test]
    fn empty_store_has_no_stats() {
        let store = LogStore::new();
        assert!(provider_stats(&store, None).is_empty());
        assert!(provider_stats(&store, Some("facebook")).is_empty());
    }

    #[test]
    fn filtered_provider_without_entries_is_omitted() {
        let store = LogStore::new();
        store.append(entry("facebook", true, vec![result(10, true)]));

        assert!(provider_stats(&store, Some("instagram")).is_empty());
        assert_eq!(provider_stats(&store, Some("facebook")).len(), 1);
    }

    #[test]
    fn counts_rates_and_flattened_average() {
        let store = LogStore::new();
        store.append(entry(
            "facebook",
            true,
            vec![result(100, true), result(300, false)],
        ));
        store.append(entry("facebook", false, vec![result(20, false)]));
        store.append(entry("facebook", true, Vec::new()));

        let stats = provider_stats(&store, None);
        assert_eq!(stats.len(), 1);
        let facebook = &stats[0];
        assert_eq!(facebook.total, 3);
        assert_eq!(facebook.successful, 2);
        assert_eq!(facebook.failed, 1);
        assert_eq!(facebook.success_rate, 67);
        // (100 + 300 + 20) / 3 results, not the mean of per-entry means
        assert_eq!(facebook.avg_response_time_ms, 140);
        assert_eq!(facebook.last_hour, 3);
        assert_eq!(facebook.last_24_hours, 3);
    }

    #[test]
    fn providers_follow_first_appearance_order() {
        let store = LogStore::new();
        store.append(entry("instagram", true, Vec::new()));
        store.append(entry("facebook", true, Vec::new()));
        store.append(entry("instagram", false, Vec::new()));

        let names: Vec<String> = provider_stats(&store, None)
            .into_iter()
            .map(|stat| stat.provider)
            .collect();
        assert_eq!(names, vec!["instagram".to_string(), "facebook".to_string()]);
    }

    #[test]
    fn windows_are_measured_from_query_time() {
        let store = LogStore::new();
        let now = Utc::now();
        store.append_at(entry("facebook", true, Vec::new()), now - Duration::minutes(5));
        store.append_at(entry("facebook", true, Vec::new()), now - Duration::hours(3));
        store.append_at(entry("facebook", true, Vec::new()), now - Duration::hours(30));

        let current = provider_stats_at(&store, None, now);
        assert_eq!(current[0].last_hour, 1);
        assert_eq!(current[0].last_24_hours, 2);
        assert_eq!(current[0].total, 3);

        let later = provider_stats_at(&store, None, now + Duration::hours(2));
        assert_eq!(later[0].last_hour, 0);
        assert_eq!(later[0].last_24_hours, 2);
    }

    #[test]
    fn alert_fires_above_min_requests_and_below_threshold() {
        let busy = [stats("facebook", 12, 5, 12, 40)];
        let alerts = alerts_for(&busy, 50, 10);
        assert_eq!(alerts, vec!["facebook: 40% success rate (7/12 failed)".to_string()]);

        let quiet = [stats("facebook", 5, 2, 5, 40)];
        assert!(alerts_for(&quiet, 50, 10).is_empty());

        let healthy = [stats("facebook", 12, 12, 12, 100)];
        assert!(alerts_for(&healthy, 50, 10).is_empty());
    }

    #[test]
    fn alerts_are_stateless() {
        let store = LogStore::new();
        for index in 0..15 {
            store.append(entry("instagram", index % 5 < 2, Vec::new()));
        }

        let first = failure_alerts(&store, DEFAULT_FAILURE_THRESHOLD, DEFAULT_MIN_REQUESTS);
        let second = failure_alerts(&store, DEFAULT_FAILURE_THRESHOLD, DEFAULT_MIN_REQUESTS);

        assert_eq!(first, vec!["instagram: 40% success rate (9/15 failed)".to_string()]);
        assert_eq!(first, second);
    }

    #[test]
    fn stale_traffic_does_not_alert() {
        let store = LogStore::new();
        let now = Utc::now();
        for _ in 0..20 {
            store.append_at(entry("facebook", false, Vec::new()), now - Duration::hours(2));
        }

        assert!(failure_alerts_at(&store, 50, 10, now).is_empty());
    }
}
