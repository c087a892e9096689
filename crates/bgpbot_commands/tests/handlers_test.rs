//! Tests for command handlers against a mock upstream.

mod test_utils;

use bgpbot_client::{GeoLocation, Totals, UpstreamReply, Vrp};
use bgpbot_commands::{
    ArgumentKind, ClassifiedResult, CommandKind, INTERNAL_ERROR, Severity, UPSTREAM_UNAVAILABLE,
};
use bgpbot_error::UpstreamErrorKind;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use strum::IntoEnumIterator;
use test_utils::{MockLookup, handlers_for};

fn answering_mock() -> MockLookup {
    let mut invalids = HashMap::new();
    invalids.insert(13335, vec!["192.0.2.0/24".to_string()]);
    MockLookup::new()
        .with_route(UpstreamReply::found("1.1.1.0/24".to_string()))
        .with_origin(UpstreamReply::found(13335))
        .with_as_path(UpstreamReply::found(vec![3356, 13335]))
        .with_roa(UpstreamReply::found("VALID".to_string()))
        .with_as_name(UpstreamReply::found("CLOUDFLARENET".to_string()))
        .with_invalids(UpstreamReply::found(invalids))
        .with_vrps(UpstreamReply::found(vec![Vrp {
            prefix: "1.1.1.0/24".to_string(),
            max_length: 24,
        }]))
        .with_sourced(UpstreamReply::found(vec!["1.1.1.0/24".to_string()]))
        .with_totals(UpstreamReply::found(Totals {
            ipv4: 1,
            ipv6: 2,
        }))
        .with_geo_ip(UpstreamReply::found(GeoLocation {
            city: "Sydney".to_string(),
            country: "Australia".to_string(),
        }))
}

fn upstream_operation(kind: CommandKind) -> &'static str {
    match kind {
        CommandKind::Route => "route",
        CommandKind::Origin => "origin",
        CommandKind::AsPath => "as_path",
        CommandKind::Roa => "roa",
        CommandKind::AsName => "as_name",
        CommandKind::Invalids => "invalids",
        CommandKind::Vrps => "vrps",
        CommandKind::Sourced => "sourced",
        CommandKind::Totals => "totals",
        CommandKind::GeoIp => "geo_ip",
    }
}

fn sample_args(kind: CommandKind) -> Vec<&'static str> {
    match kind.command().argument() {
        ArgumentKind::Prefix => vec!["1.1.1.1"],
        ArgumentKind::AsNumber => vec!["13335"],
        ArgumentKind::None => Vec::new(),
    }
}

#[tokio::test]
async fn test_route_success() {
    let mock = Arc::new(
        MockLookup::new().with_route(UpstreamReply::found("1.1.1.0/24".to_string())),
    );
    let handlers = handlers_for(mock.clone());

    let result = handlers.handle(CommandKind::Route, &["1.1.1.1"]).await;

    assert_eq!(
        result,
        ClassifiedResult::success("The route for 1.1.1.1 is 1.1.1.0/24")
    );
}

#[tokio::test]
async fn test_missing_prefix_is_a_warning() {
    let mock = Arc::new(MockLookup::new().with_origin(UpstreamReply::missing()));
    let handlers = handlers_for(mock.clone());

    let result = handlers.handle(CommandKind::Origin, &["203.0.113.0/24"]).await;

    assert_eq!(*result.severity(), Severity::Warning);
    assert_eq!(result.text(), "No prefix exists for 203.0.113.0/24");
}

#[tokio::test(start_paused = true)]
async fn test_repeat_within_ttl_calls_upstream_once() {
    let mock = Arc::new(MockLookup::new().with_origin(UpstreamReply::found(13335)));
    let handlers = handlers_for(mock.clone());

    let first = handlers.handle(CommandKind::Origin, &["1.1.1.1"]).await;
    tokio::time::advance(Duration::from_secs(30)).await;
    let second = handlers.handle(CommandKind::Origin, &["1.1.1.1"]).await;

    assert_eq!(first, second);
    assert_eq!(first.text(), "The origin AS for 1.1.1.1 is AS13335");
    assert_eq!(mock.call_count("origin"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_every_command_is_cached_within_ttl() {
    let mock = Arc::new(answering_mock());
    let handlers = handlers_for(mock.clone());

    for kind in CommandKind::iter() {
        let args = sample_args(kind);
        let first = handlers.handle(kind, &args).await;
        tokio::time::advance(Duration::from_secs(1)).await;
        let second = handlers.handle(kind, &args).await;

        assert_ne!(*first.severity(), Severity::Failure, "{kind}: {}", first.text());
        assert_eq!(first, second, "{kind}");
        assert_eq!(mock.call_count(upstream_operation(kind)), 1, "{kind}");
    }
    assert_eq!(mock.total_calls(), CommandKind::iter().count());
}

#[tokio::test(start_paused = true)]
async fn test_lookup_after_ttl_calls_upstream_again() {
    let mock = Arc::new(MockLookup::new().with_origin(UpstreamReply::found(13335)));
    let handlers = handlers_for(mock.clone());

    handlers.handle(CommandKind::Origin, &["1.1.1.1"]).await;
    tokio::time::advance(Duration::from_secs(61)).await;
    handlers.handle(CommandKind::Origin, &["1.1.1.1"]).await;

    assert_eq!(mock.call_count("origin"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_not_found_is_cached() {
    let mock = Arc::new(MockLookup::new().with_route(UpstreamReply::missing()));
    let handlers = handlers_for(mock.clone());

    for _ in 0..3 {
        let result = handlers.handle(CommandKind::Route, &["203.0.113.0/24"]).await;
        assert_eq!(*result.severity(), Severity::Warning);
    }
    assert_eq!(mock.call_count("route"), 1);
}

#[tokio::test]
async fn test_as_number_zero_fails_without_upstream_call() {
    let mock = Arc::new(MockLookup::new());
    let handlers = handlers_for(mock.clone());

    let result = handlers.handle(CommandKind::AsName, &["0"]).await;

    assert_eq!(result, ClassifiedResult::failure("0 is not a valid ASN"));
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn test_non_integer_as_number_fails() {
    let mock = Arc::new(MockLookup::new());
    let handlers = handlers_for(mock.clone());

    let result = handlers.handle(CommandKind::Vrps, &["cloudflare"]).await;

    assert_eq!(result, ClassifiedResult::failure("cloudflare is not an integer"));
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn test_rejected_prefix_reports_reason() {
    let mock = Arc::new(MockLookup::new());
    let handlers = handlers_for(mock.clone());

    let result = handlers.handle(CommandKind::Roa, &["banana"]).await;

    assert_eq!(
        result,
        ClassifiedResult::failure("banana is not a valid IP address or prefix")
    );
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn test_totals_success() {
    let mock = Arc::new(MockLookup::new().with_totals(UpstreamReply::found(Totals {
        ipv4: 1_000_000,
        ipv6: 200_000,
    })));
    let handlers = handlers_for(mock.clone());

    let result = handlers.handle(CommandKind::Totals, &[]).await;

    assert_eq!(
        result,
        ClassifiedResult::success("I see 1000000 IPv4 and 200000 IPv6 prefixes active")
    );
}

#[tokio::test]
async fn test_totals_ignores_arguments() {
    let mock = Arc::new(MockLookup::new().with_totals(UpstreamReply::found(Totals {
        ipv4: 1,
        ipv6: 2,
    })));
    let handlers = handlers_for(mock.clone());

    handlers.handle(CommandKind::Totals, &[]).await;
    handlers.handle(CommandKind::Totals, &["extra", "words"]).await;

    assert_eq!(mock.call_count("totals"), 1);
}

#[tokio::test]
async fn test_roa_unknown_is_spelled_out() {
    let mock = Arc::new(MockLookup::new().with_roa(UpstreamReply::found("UNKNOWN".to_string())));
    let handlers = handlers_for(mock.clone());

    let result = handlers.handle(CommandKind::Roa, &["192.0.2.0/24"]).await;

    assert_eq!(*result.severity(), Severity::Success);
    assert!(result.text().contains("UNKNOWN (NO ROA)"));
}

#[tokio::test]
async fn test_as_path_is_space_separated() {
    let mock = Arc::new(
        MockLookup::new().with_as_path(UpstreamReply::found(vec![3356, 174, 13335])),
    );
    let handlers = handlers_for(mock.clone());

    let result = handlers.handle(CommandKind::AsPath, &["1.1.1.1"]).await;

    assert_eq!(result.text(), "The AS path for 1.1.1.1 is 3356 174 13335");
}

#[tokio::test]
async fn test_as_name_accepts_as_prefix() {
    let mock = Arc::new(
        MockLookup::new().with_as_name(UpstreamReply::found("CLOUDFLARENET".to_string())),
    );
    let handlers = handlers_for(mock.clone());

    let result = handlers.handle(CommandKind::AsName, &["AS13335"]).await;

    assert_eq!(result.text(), "The AS name for 13335 is CLOUDFLARENET");
}

#[tokio::test]
async fn test_geoip_success() {
    let mock = Arc::new(MockLookup::new().with_geo_ip(UpstreamReply::found(GeoLocation {
        city: "Sydney".to_string(),
        country: "Australia".to_string(),
    })));
    let handlers = handlers_for(mock.clone());

    let result = handlers.handle(CommandKind::GeoIp, &["1.1.1.1"]).await;

    assert_eq!(result.text(), "1.1.1.1 might be located in Sydney, Australia");
}

#[tokio::test]
async fn test_vrps_listing_and_empty() {
    let vrps = vec![
        Vrp {
            prefix: "1.1.1.0/24".to_string(),
            max_length: 24,
        },
        Vrp {
            prefix: "2606:4700::/32".to_string(),
            max_length: 48,
        },
    ];
    let mock = Arc::new(MockLookup::new().with_vrps(UpstreamReply::found(vrps)));
    let handlers = handlers_for(mock.clone());

    let result = handlers.handle(CommandKind::Vrps, &["13335"]).await;
    assert_eq!(
        result.text(),
        "AS13335 has the following VRPs:\n\t1.1.1.0/24 max /24\n\t2606:4700::/32 max /48"
    );

    let empty = Arc::new(MockLookup::new().with_vrps(UpstreamReply::found(Vec::new())));
    let result = handlers_for(empty).handle(CommandKind::Vrps, &["15169"]).await;
    assert_eq!(result, ClassifiedResult::warning("AS15169 has no VRPs"));
}

#[tokio::test]
async fn test_sourced_missing_is_a_warning() {
    let mock = Arc::new(MockLookup::new().with_sourced(UpstreamReply::missing()));
    let handlers = handlers_for(mock.clone());

    let result = handlers.handle(CommandKind::Sourced, &["13335"]).await;

    assert_eq!(
        result,
        ClassifiedResult::warning("AS13335 is not sourcing any prefixes")
    );
}

#[tokio::test]
async fn test_invalids_share_one_bulk_fetch() {
    let mut table = HashMap::new();
    table.insert(
        13335,
        vec!["192.0.2.0/24".to_string(), "198.51.100.0/24".to_string()],
    );
    let mock = Arc::new(MockLookup::new().with_invalids(UpstreamReply::found(table)));
    let handlers = handlers_for(mock.clone());

    let dirty = handlers.handle(CommandKind::Invalids, &["13335"]).await;
    let clean = handlers.handle(CommandKind::Invalids, &["15169"]).await;

    assert_eq!(*dirty.severity(), Severity::Warning);
    assert_eq!(
        dirty.text(),
        "AS13335 is originating the following invalid prefixes:\n\t192.0.2.0/24\n\t198.51.100.0/24"
    );
    assert_eq!(
        clean,
        ClassifiedResult::success("AS15169 is not originating any invalid prefixes")
    );
    assert_eq!(mock.call_count("invalids"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_bulk_invalids_expire_as_one_unit() {
    let mock = Arc::new(answering_mock());
    let handlers = handlers_for(mock.clone());

    handlers.handle(CommandKind::Invalids, &["13335"]).await;
    tokio::time::advance(Duration::from_secs(1800)).await;
    handlers.handle(CommandKind::Invalids, &["15169"]).await;
    assert_eq!(mock.call_count("invalids"), 1);

    tokio::time::advance(Duration::from_secs(1801)).await;
    let result = handlers.handle(CommandKind::Invalids, &["174"]).await;
    assert_eq!(
        result,
        ClassifiedResult::success("AS174 is not originating any invalid prefixes")
    );
    assert_eq!(mock.call_count("invalids"), 2);
}

#[tokio::test]
async fn test_failed_bulk_invalids_fetch_is_not_cached() {
    let mock = Arc::new(
        answering_mock().failing_first(UpstreamErrorKind::Transport("reset".to_string()), 1),
    );
    let handlers = handlers_for(mock.clone());

    let failed = handlers.handle(CommandKind::Invalids, &["13335"]).await;
    assert_eq!(failed, ClassifiedResult::failure(UPSTREAM_UNAVAILABLE));

    let retried = handlers.handle(CommandKind::Invalids, &["13335"]).await;
    assert_eq!(*retried.severity(), Severity::Warning);
    assert_eq!(
        retried.text(),
        "AS13335 is originating the following invalid prefixes:\n\t192.0.2.0/24"
    );
    assert_eq!(mock.call_count("invalids"), 2);
}

#[tokio::test]
async fn test_upstream_failure_is_generic_and_uncached() {
    let mock = Arc::new(
        MockLookup::new().failing(UpstreamErrorKind::Timeout("deadline elapsed".to_string())),
    );
    let handlers = handlers_for(mock.clone());

    let first = handlers.handle(CommandKind::Route, &["1.1.1.1"]).await;
    let second = handlers.handle(CommandKind::Route, &["1.1.1.1"]).await;

    assert_eq!(first, ClassifiedResult::failure(UPSTREAM_UNAVAILABLE));
    assert_eq!(second, first);
    assert_eq!(mock.call_count("route"), 2);
}

#[tokio::test]
async fn test_non_200_status_is_unavailable() {
    let mock = Arc::new(MockLookup::new().with_totals(UpstreamReply::with_status(503)));
    let handlers = handlers_for(mock.clone());

    let result = handlers.handle(CommandKind::Totals, &[]).await;

    assert_eq!(result, ClassifiedResult::failure(UPSTREAM_UNAVAILABLE));
    assert_ne!(result.text(), INTERNAL_ERROR);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_same_key_calls_upstream_once() {
    let mock = Arc::new(
        MockLookup::new()
            .with_as_name(UpstreamReply::found("GOOGLE".to_string()))
            .with_latency(Duration::from_millis(50)),
    );
    let handlers = handlers_for(mock.clone());

    let lookups = (0..6).map(|_| {
        let handlers = handlers.clone();
        tokio::spawn(async move { handlers.handle(CommandKind::AsName, &["15169"]).await })
    });
    for result in futures::future::join_all(lookups).await {
        assert_eq!(result.unwrap().text(), "The AS name for 15169 is GOOGLE");
    }

    assert_eq!(mock.call_count("as_name"), 1);
}
