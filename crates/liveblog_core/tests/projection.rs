use chrono::FixedOffset;
use liveblog_core::{
    decode_posts, EventProjector, MalformedPost, Post, PostId, PostItem, StartDate,
    WidgetSettings,
};
use serde_json::json;

fn post_at(published: &str, texts: &[&str]) -> Post {
    let mut post = Post::open("p1");
    post.published_date = Some(published.to_string());
    post.items = texts.iter().map(|text| PostItem::new(*text)).collect();
    post
}

#[test]
fn items_are_joined_with_line_breaks() {
    let projector = EventProjector::default();
    let event = projector.project(&post_at("2016-05-10T12:30:00+00:00", &["a", "b", "c"]));
    assert_eq!(event.text, "a<br />b<br />c");
    assert_eq!(event.post_id, PostId::from("p1"));
}

#[test]
fn post_without_items_has_empty_text() {
    let projector = EventProjector::default();
    let event = projector.project(&post_at("2016-05-10T12:30:00+00:00", &[]));
    assert_eq!(event.text, "");
    assert!(event.has_date());
}

#[test]
fn calendar_fields_come_from_one_timestamp() {
    let projector = EventProjector::default();
    let event = projector.project(&post_at("2016-05-10T12:30:00+00:00", &["a"]));
    assert_eq!(
        event.start_date,
        Some(StartDate {
            year: 2016,
            month: 5,
            day: 10,
            hour: 12,
            minute: 30,
        })
    );
    assert_eq!(event.display_date.as_deref(), Some("May 10, 2016 12:30"));
}

#[test]
fn configured_offset_moves_every_field_together() {
    let settings = WidgetSettings {
        utc_offset_minutes: 60,
        datetime_format: "%Y-%m-%d %H:%M".to_string(),
        ..WidgetSettings::default()
    };
    let projector = EventProjector::from_settings(&settings);
    let event = projector.project(&post_at("2016-12-31T23:30:00Z", &["a"]));
    assert_eq!(
        event.start_date,
        Some(StartDate {
            year: 2017,
            month: 1,
            day: 1,
            hour: 0,
            minute: 30,
        })
    );
    assert_eq!(event.display_date.as_deref(), Some("2017-01-01 00:30"));
}

#[test]
fn unparseable_timestamp_is_reported_and_projected_softly() {
    let projector = EventProjector::default();
    let post = post_at("last tuesday", &["a"]);

    let err = projector.try_project(&post).unwrap_err();
    assert_eq!(
        err,
        MalformedPost::Timestamp {
            post_id: PostId::from("p1"),
            raw: "last tuesday".to_string(),
        }
    );

    let event = projector.project(&post);
    assert_eq!(event.start_date, None);
    assert_eq!(event.display_date, None);
    assert_eq!(event.text, "a");
}

#[test]
fn missing_timestamp_is_soft() {
    let projector = EventProjector::default();
    let mut post = post_at("2016-05-10T12:30:00+00:00", &["a"]);
    post.published_date = None;
    assert!(matches!(
        projector.try_project(&post),
        Err(MalformedPost::MissingTimestamp { .. })
    ));
    assert_eq!(projector.project(&post).display_date, None);
}

#[test]
fn broken_format_string_does_not_panic() {
    let projector = EventProjector::new("%Y %Q", FixedOffset::east_opt(0).unwrap());
    let post = post_at("2016-05-10T12:30:00+00:00", &["a"]);
    assert!(matches!(
        projector.try_project(&post),
        Err(MalformedPost::Format { .. })
    ));
    let event = projector.project(&post);
    assert_eq!(event.display_date, None);
    assert_eq!(event.text, "a");
}

#[test]
fn decode_skips_items_without_identity() {
    let posts = decode_posts(vec![
        json!({"_id": "a", "post_status": "open", "items": [{"text": "x"}]}),
        json!({"post_status": "open"}),
        json!({"_id": "b", "post_status": "draft", "deleted": true}),
    ]);
    let ids: Vec<&str> = posts.iter().map(|post| post.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(posts[0].is_visible());
    assert!(!posts[1].is_visible());
}
