mod common;

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use common::{chan, channel, channel_with, dm, dm_ref, register};
use huddle_core::{Core, CoreError};

// These tests run on paused tokio time: `sleep` in the test body advances
// the clock through any pending timer, so "before fireAt" and "after fireAt"
// are deterministic.

#[tokio::test(start_paused = true)]
async fn scheduled_send_is_invisible_until_it_fires() {
    let core = Core::new();
    let alice = register(&core, "alice").await;
    let bob = register(&core, "bob").await;
    let ch = channel_with(&core, &alice, "general", &[&bob]).await;

    let id = core
        .schedule_send(
            &alice.token,
            chan(ch),
            "@bob the future is now",
            Utc::now() + TimeDelta::seconds(2),
        )
        .await
        .unwrap();

    // Nothing visible, nothing notified, but the id is already reserved.
    let page = core.list_messages(&alice.token, chan(ch), 0).await.unwrap();
    assert!(page.messages.is_empty());
    assert!(core.get_notifications(&bob.token).await.unwrap().is_empty());
    assert!(core.search_messages(&alice.token, "future").await.unwrap().is_empty());

    tokio::time::sleep(Duration::from_secs(3)).await;

    let page = core.list_messages(&alice.token, chan(ch), 0).await.unwrap();
    assert_eq!(page.messages.len(), 1);
    assert_eq!(page.messages[0].message_id, id);
    assert_eq!(page.messages[0].body, "@bob the future is now");

    let feed = core.get_notifications(&bob.token).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert!(feed[0].message.starts_with("alice tagged you in general"));
}

#[tokio::test(start_paused = true)]
async fn schedule_validates_eagerly() {
    let core = Core::new();
    let alice = register(&core, "alice").await;
    let bob = register(&core, "bob").await;
    let ch = channel(&core, &alice, "general").await;
    let future = Utc::now() + TimeDelta::seconds(10);

    assert_eq!(
        core.schedule_send("bogus", chan(ch), "hi", future).await,
        Err(CoreError::Unauthorized)
    );
    assert!(matches!(
        core.schedule_send(&bob.token, chan(ch), "hi", future).await,
        Err(CoreError::Forbidden(_))
    ));
    assert!(matches!(
        core.schedule_send(&alice.token, chan(ch), "", future).await,
        Err(CoreError::BadRequest(_))
    ));
    assert!(matches!(
        core.schedule_send(
            &alice.token,
            chan(ch),
            "hi",
            Utc::now() - TimeDelta::seconds(1),
        )
        .await,
        Err(CoreError::BadRequest(_))
    ));

    // None of the failures consumed an id or left anything behind.
    let real = core.send(&alice.token, chan(ch), "now").await.unwrap();
    assert_eq!(real.0, 1);
}

#[tokio::test(start_paused = true)]
async fn scheduled_sends_fire_independently_into_dms_too() {
    let core = Core::new();
    let alice = register(&core, "alice").await;
    let bob = register(&core, "bob").await;
    let ch = channel(&core, &alice, "general").await;
    let d = dm(&core, &alice, &[&bob]).await;

    let late = core
        .schedule_send(
            &alice.token,
            chan(ch),
            "channel, later",
            Utc::now() + TimeDelta::seconds(5),
        )
        .await
        .unwrap();
    let early = core
        .schedule_send(
            &alice.token,
            dm_ref(d),
            "dm, sooner",
            Utc::now() + TimeDelta::seconds(2),
        )
        .await
        .unwrap();
    assert!(late < early); // reservation order, not fire order

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(
        core.list_messages(&bob.token, dm_ref(d), 0).await.unwrap().messages.len(),
        1
    );
    assert!(core.list_messages(&alice.token, chan(ch), 0).await.unwrap().messages.is_empty());

    tokio::time::sleep(Duration::from_secs(3)).await;
    let page = core.list_messages(&alice.token, chan(ch), 0).await.unwrap();
    assert_eq!(page.messages.len(), 1);
    assert_eq!(page.messages[0].message_id, late);
}

#[tokio::test(start_paused = true)]
async fn scheduled_send_into_a_removed_dm_is_dropped() {
    let core = Core::new();
    let alice = register(&core, "alice").await;
    let d = dm(&core, &alice, &[]).await;

    core.schedule_send(
        &alice.token,
        dm_ref(d),
        "into the void",
        Utc::now() + TimeDelta::seconds(2),
    )
    .await
    .unwrap();
    core.remove_dm(&alice.token, d).await.unwrap();

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(core.message_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn standup_collects_lines_and_posts_once() {
    let core = Core::new();
    let alice = register(&core, "alice").await;
    let bob = register(&core, "bob").await;
    let ch = channel_with(&core, &alice, "general", &[&bob]).await;

    let finish = core.standup_start(&alice.token, ch, 2).await.unwrap();
    let (active, finish_at) = core.standup_active(&alice.token, ch).await.unwrap();
    assert!(active);
    assert_eq!(finish_at, Some(finish));

    // Only one standup at a time.
    assert!(matches!(
        core.standup_start(&bob.token, ch, 5).await,
        Err(CoreError::BadRequest(_))
    ));

    core.standup_send(&alice.token, ch, "did a thing").await.unwrap();
    core.standup_send(&bob.token, ch, "did another").await.unwrap();

    // Nothing posted while the standup runs.
    assert!(core.list_messages(&alice.token, chan(ch), 0).await.unwrap().messages.is_empty());

    tokio::time::sleep(Duration::from_secs(3)).await;

    let page = core.list_messages(&bob.token, chan(ch), 0).await.unwrap();
    assert_eq!(page.messages.len(), 1);
    assert_eq!(page.messages[0].body, "alice: did a thing\nbob: did another\n");
    assert_eq!(page.messages[0].author_id, alice.id);

    let (active, finish_at) = core.standup_active(&alice.token, ch).await.unwrap();
    assert!(!active);
    assert_eq!(finish_at, None);

    // Sends after the close are rejected again.
    assert!(matches!(
        core.standup_send(&alice.token, ch, "too late").await,
        Err(CoreError::BadRequest(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn standup_post_runs_tag_and_notify() {
    let core = Core::new();
    let alice = register(&core, "alice").await;
    let bob = register(&core, "bob").await;
    let ch = channel_with(&core, &alice, "general", &[&bob]).await;

    core.standup_start(&alice.token, ch, 2).await.unwrap();
    core.standup_send(&alice.token, ch, "ping @bob").await.unwrap();
    assert!(core.get_notifications(&bob.token).await.unwrap().is_empty());

    tokio::time::sleep(Duration::from_secs(3)).await;

    let feed = core.get_notifications(&bob.token).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert!(feed[0].message.starts_with("alice tagged you in general"));
}

#[tokio::test(start_paused = true)]
async fn empty_standup_posts_nothing() {
    let core = Core::new();
    let alice = register(&core, "alice").await;
    let ch = channel(&core, &alice, "general").await;

    core.standup_start(&alice.token, ch, 1).await.unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(core.list_messages(&alice.token, chan(ch), 0).await.unwrap().messages.is_empty());

    // And the channel is free for the next one.
    core.standup_start(&alice.token, ch, 1).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn standup_validation() {
    let core = Core::new();
    let alice = register(&core, "alice").await;
    let bob = register(&core, "bob").await;
    let ch = channel(&core, &alice, "general").await;

    assert!(matches!(
        core.standup_start(&alice.token, ch, -1).await,
        Err(CoreError::BadRequest(_))
    ));
    assert!(matches!(
        core.standup_start(&bob.token, ch, 5).await,
        Err(CoreError::Forbidden(_))
    ));
    assert!(matches!(
        core.standup_send(&alice.token, ch, "no standup yet").await,
        Err(CoreError::BadRequest(_))
    ));

    core.standup_start(&alice.token, ch, 60).await.unwrap();
    assert!(matches!(
        core.standup_send(&alice.token, ch, &"x".repeat(1001)).await,
        Err(CoreError::BadRequest(_))
    ));
    assert!(matches!(
        core.standup_send(&bob.token, ch, "outsider").await,
        Err(CoreError::Forbidden(_))
    ));
    assert!(matches!(
        core.standup_active(&bob.token, ch).await,
        Err(CoreError::Forbidden(_))
    ));
}
