mod common;

use common::{GUILD, MockHost, OTHER, TARGET};
use pb_core::host::Archive;
use pb_core::purge::collect;
use std::sync::atomic::Ordering;

fn ids(found: &[pb_core::purge::TargetMessage]) -> Vec<u64> {
    found.iter().map(|m| m.id.get()).collect()
}

#[tokio::test]
async fn scans_channels_then_each_thread_kind_in_order() {
    let host = MockHost::new()
        .channel(1, "general", &[(10, TARGET), (11, OTHER), (12, TARGET)])
        .archived_thread(1, Archive::Private, 13, "secret", &[(40, TARGET)])
        .active_thread(1, 11, "live", &[(20, TARGET), (21, OTHER)])
        .archived_thread(1, Archive::Public, 12, "old", &[(30, TARGET)])
        .channel(2, "locked", &[(50, TARGET)])
        .unreadable(2)
        .channel(3, "memes", &[(60, OTHER), (61, TARGET)])
        .active_thread(3, 32, "live memes", &[(65, TARGET)])
        .archived_thread(3, Archive::Public, 31, "old memes", &[(70, TARGET)]);

    let found = collect(&host, GUILD, TARGET).await;

    let order: Vec<(u64, &str)> = found
        .iter()
        .map(|m| (m.id.get(), m.channel_label.as_str()))
        .collect();
    assert_eq!(
        order,
        [
            (10, "general"),
            (12, "general"),
            (20, "live"),
            (30, "old"),
            (40, "secret"),
            (61, "memes"),
            (65, "live memes"),
            (70, "old memes"),
        ]
    );
}

#[tokio::test]
async fn active_threads_are_listed_once_per_collection() {
    let host = MockHost::new()
        .channel(1, "a", &[])
        .channel(2, "b", &[])
        .channel(3, "c", &[])
        .active_thread(2, 20, "b-thread", &[(1, TARGET)]);

    let found = collect(&host, GUILD, TARGET).await;

    assert_eq!(ids(&found), [1]);
    assert_eq!(host.active_listings.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn only_the_target_author_is_collected() {
    let host = MockHost::new().channel(1, "general", &[(1, OTHER), (2, TARGET), (3, OTHER)]);

    let found = collect(&host, GUILD, TARGET).await;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id.get(), 2);
    assert_eq!(found[0].channel_id.get(), 1);
}

#[tokio::test]
async fn unreadable_thread_does_not_hide_its_siblings() {
    let host = MockHost::new()
        .channel(1, "general", &[])
        .active_thread(1, 11, "a", &[(1, TARGET)])
        .active_thread(1, 12, "b", &[(2, TARGET)])
        .active_thread(1, 13, "c", &[(3, TARGET)])
        .unreadable(12);

    assert_eq!(ids(&collect(&host, GUILD, TARGET).await), [1, 3]);
}

#[tokio::test]
async fn channel_listing_failure_finds_nothing() {
    let host = MockHost::new()
        .channel(1, "general", &[(1, TARGET)])
        .broken_channel_listing();

    assert!(collect(&host, GUILD, TARGET).await.is_empty());
    assert_eq!(host.active_listings.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn active_thread_failure_keeps_channels_and_archives() {
    let host = MockHost::new()
        .channel(1, "general", &[(1, TARGET)])
        .active_thread(1, 11, "live", &[(2, TARGET)])
        .archived_thread(1, Archive::Public, 12, "old", &[(3, TARGET)])
        .broken_active_listing();

    assert_eq!(ids(&collect(&host, GUILD, TARGET).await), [1, 3]);
}

#[tokio::test]
async fn archive_listing_failure_skips_only_that_listing() {
    let host = MockHost::new()
        .channel(1, "general", &[(1, TARGET)])
        .archived_thread(1, Archive::Public, 11, "old", &[(2, TARGET)])
        .archived_thread(1, Archive::Private, 12, "secret", &[(3, TARGET)])
        .channel(2, "memes", &[(4, TARGET)])
        .archived_thread(2, Archive::Public, 21, "old memes", &[(5, TARGET)])
        .failing_archive(1, Archive::Public);

    assert_eq!(ids(&collect(&host, GUILD, TARGET).await), [1, 3, 4, 5]);
}

#[tokio::test]
async fn empty_guild_yields_nothing() {
    let host = MockHost::new();
    assert!(collect(&host, GUILD, TARGET).await.is_empty());
}
