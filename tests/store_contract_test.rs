mod helpers;

use std::collections::BTreeMap;

use helpers::{backends, entry, entry_at, event_at, restricted};
use silbenkling::error::KnowledgeError;
use silbenkling::knowledge::topic::TopicPattern;
use silbenkling::knowledge::types::{EntryType, EventFilter, EventType};
use silbenkling::store::{EVENT_LIMIT, SEARCH_LIMIT};

fn subtree(path: &str) -> TopicPattern {
    TopicPattern::parse(path)
}

#[test]
fn entries_are_found_from_own_topic_and_ancestors() {
    for store in backends() {
        let e = entry("/team/onboarding/laptops", "Order laptops two weeks ahead");
        store.insert_entry(&e).unwrap();

        for pattern in ["/team/onboarding/laptops", "/team/onboarding", "/team", "/"] {
            let found = store.get_entries_by_topic(&subtree(pattern), "bob").unwrap();
            assert_eq!(found.len(), 1, "{}: pattern {pattern}", store.backend());
            assert_eq!(found[0], e);
        }
    }
}

#[test]
fn subtree_pattern_does_not_match_siblings() {
    for store in backends() {
        store.insert_entry(&entry("/team", "team entry")).unwrap();
        store.insert_entry(&entry("/teamwork", "teamwork entry")).unwrap();

        let found = store.get_entries_by_topic(&subtree("/team"), "bob").unwrap();
        assert_eq!(found.len(), 1, "{}", store.backend());
        assert_eq!(found[0].topic, "/team");

        let found = store.get_entries_by_topic(&subtree("/team*"), "bob").unwrap();
        assert_eq!(found.len(), 2, "{}: wildcard is a raw prefix", store.backend());
    }
}

#[test]
fn like_metacharacters_in_topics_are_literal() {
    for store in backends() {
        store.insert_entry(&entry("/100%/plan", "literal percent")).unwrap();
        store.insert_entry(&entry("/100x/plan", "other")).unwrap();

        let found = store.get_entries_by_topic(&subtree("/100%"), "bob").unwrap();
        assert_eq!(found.len(), 1, "{}", store.backend());
        assert_eq!(found[0].content, "literal percent");

        let found = store.get_entries_by_topic(&subtree("/100_*"), "bob").unwrap();
        assert!(found.is_empty(), "{}: '_' must not be a wildcard", store.backend());
    }
}

#[test]
fn restricted_entries_are_hidden_from_other_actors() {
    for store in backends() {
        let secret = restricted(entry("/hr", "Salary bands"), &["carol", "dave"]);
        let public = entry("/hr", "Holiday calendar");
        store.insert_entry(&secret).unwrap();
        store.insert_entry(&public).unwrap();

        let as_bob = store.get_entries_by_topic(&subtree("/hr"), "bob").unwrap();
        assert_eq!(as_bob.len(), 1, "{}", store.backend());
        assert_eq!(as_bob[0].id, public.id);

        let as_carol = store.get_entries_by_topic(&subtree("/hr"), "carol").unwrap();
        assert_eq!(as_carol.len(), 2, "{}", store.backend());

        let search = store.search_entries(&subtree("/hr"), "Salary", "bob").unwrap();
        assert!(search.is_empty(), "{}", store.backend());
        let search = store.search_entries(&subtree("/hr"), "Salary", "dave").unwrap();
        assert_eq!(search.len(), 1, "{}", store.backend());
    }
}

#[test]
fn entries_come_back_newest_first() {
    for store in backends() {
        store.insert_entry(&entry_at("/ops", "middle", 5)).unwrap();
        store.insert_entry(&entry_at("/ops", "oldest", 0)).unwrap();
        store.insert_entry(&entry_at("/ops/db", "newest", 10)).unwrap();

        let found = store.get_entries_by_topic(&subtree("/ops"), "bob").unwrap();
        let contents: Vec<&str> = found.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["newest", "middle", "oldest"], "{}", store.backend());
    }
}

#[test]
fn tags_and_context_round_trip() {
    for store in backends() {
        let mut e = entry("/docs", "Runbook");
        e.entry_type = EntryType::Doc;
        e.metadata.tags = vec!["b".into(), "a".into()];
        e.metadata.context = Some(BTreeMap::from([("k".to_string(), "v".to_string())]));
        store.insert_entry(&e).unwrap();

        let found = store.get_entries_by_topic(&subtree("/docs"), "bob").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].metadata.tags, vec!["b", "a"], "{}", store.backend());
        assert_eq!(found[0].metadata.context, e.metadata.context);
        assert_eq!(found[0], e);
    }
}

#[test]
fn duplicate_entry_id_is_a_storage_error() {
    for store in backends() {
        let e = entry("/dup", "once");
        store.insert_entry(&e).unwrap();
        let err = store.insert_entry(&e).unwrap_err();
        assert!(matches!(err, KnowledgeError::Storage(_)), "{}", store.backend());
    }
}

#[test]
fn search_matches_content_or_tags_case_sensitively() {
    for store in backends() {
        let mut tagged = entry("/it", "Printer on floor 3");
        tagged.metadata.tags = vec!["hardware".into()];
        store.insert_entry(&tagged).unwrap();
        store.insert_entry(&entry("/it", "Reset your VPN token monthly")).unwrap();

        let by_content = store.search_entries(&subtree("/it"), "VPN", "bob").unwrap();
        assert_eq!(by_content.len(), 1, "{}", store.backend());

        let by_tag = store.search_entries(&subtree("/it"), "hardware", "bob").unwrap();
        assert_eq!(by_tag.len(), 1, "{}", store.backend());
        assert_eq!(by_tag[0].id, tagged.id);

        let wrong_case = store.search_entries(&subtree("/it"), "vpn", "bob").unwrap();
        assert!(wrong_case.is_empty(), "{}", store.backend());
    }
}

#[test]
fn search_is_capped() {
    for store in backends() {
        for i in 0..(SEARCH_LIMIT as i64 + 5) {
            store.insert_entry(&entry_at("/bulk", &format!("note {i}"), i)).unwrap();
        }

        let found = store.search_entries(&subtree("/bulk"), "note", "bob").unwrap();
        assert_eq!(found.len(), SEARCH_LIMIT, "{}", store.backend());
        assert_eq!(found[0].content, format!("note {}", SEARCH_LIMIT + 4));

        let all = store.get_entries_by_topic(&subtree("/bulk"), "bob").unwrap();
        assert_eq!(all.len(), SEARCH_LIMIT + 5, "{}: topic fetch is unbounded", store.backend());
    }
}

#[test]
fn events_filter_by_actor_type_topic_and_range() {
    for store in backends() {
        store.insert_event(&event_at(EventType::QuestionAsked, "alice", "/team", 0)).unwrap();
        store.insert_event(&event_at(EventType::QuestionAnswered, "alice", "/team/a", 1)).unwrap();
        store.insert_event(&event_at(EventType::EntryAdded, "alice", "/other", 2)).unwrap();
        store.insert_event(&event_at(EventType::QuestionAsked, "bob", "/team", 3)).unwrap();

        let alice = EventFilter {
            actor: Some("alice".into()),
            ..Default::default()
        };
        let events = store.get_events(&alice).unwrap();
        assert_eq!(events.len(), 3, "{}", store.backend());
        assert!(events.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

        let team_questions = EventFilter {
            topic: Some(subtree("/team")),
            types: vec![EventType::QuestionAsked, EventType::QuestionAnswered],
            actor: Some("alice".into()),
            ..Default::default()
        };
        assert_eq!(store.get_events(&team_questions).unwrap().len(), 2, "{}", store.backend());

        let window = EventFilter {
            from: Some(helpers::base_time() + chrono::Duration::minutes(1)),
            to: Some(helpers::base_time() + chrono::Duration::minutes(2)),
            ..Default::default()
        };
        let events = store.get_events(&window).unwrap();
        let types: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![EventType::EntryAdded, EventType::QuestionAnswered],
            "{}: bounds are inclusive",
            store.backend()
        );
    }
}

#[test]
fn sub_microsecond_bounds_select_the_same_events_everywhere() {
    let at = helpers::base_time() + chrono::Duration::minutes(1);
    let half_micro = chrono::Duration::nanoseconds(500);

    for store in backends() {
        store.insert_event(&event_at(EventType::QuestionAsked, "alice", "/t", 1)).unwrap();

        let after = EventFilter {
            from: Some(at + half_micro),
            ..Default::default()
        };
        assert!(store.get_events(&after).unwrap().is_empty(), "{}", store.backend());

        let until = EventFilter {
            to: Some(at + half_micro),
            ..Default::default()
        };
        assert_eq!(store.get_events(&until).unwrap().len(), 1, "{}", store.backend());

        let before = EventFilter {
            to: Some(at - half_micro),
            ..Default::default()
        };
        assert!(store.get_events(&before).unwrap().is_empty(), "{}", store.backend());
    }
}

#[test]
fn same_instant_events_break_ties_by_id_descending() {
    for store in backends() {
        let mut first = event_at(EventType::QuestionAsked, "alice", "/t", 0);
        first.id = "evt-a".into();
        let mut second = event_at(EventType::QuestionAnswered, "alice", "/t", 0);
        second.id = "evt-b".into();
        store.insert_event(&first).unwrap();
        store.insert_event(&second).unwrap();

        let ids: Vec<String> = store
            .get_events(&EventFilter::default())
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["evt-b", "evt-a"], "{}", store.backend());
    }
}

#[test]
fn events_are_capped_and_newest_first() {
    for store in backends() {
        for i in 0..(EVENT_LIMIT as i64 + 20) {
            store.insert_event(&event_at(EventType::EntryAdded, "alice", "/t", i)).unwrap();
        }

        let events = store.get_events(&EventFilter::default()).unwrap();
        assert_eq!(events.len(), EVENT_LIMIT, "{}", store.backend());
        assert_eq!(
            events[0].timestamp,
            helpers::base_time() + chrono::Duration::minutes(EVENT_LIMIT as i64 + 19)
        );
        assert!(events.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }
}

#[test]
fn event_payload_and_entry_ref_round_trip() {
    for store in backends() {
        let mut event = event_at(EventType::QaConfirmed, "alice", "/t", 0);
        event.entry_id = Some("not-a-real-entry".into());
        event.payload = silbenkling::knowledge::types::payload(serde_json::json!({
            "question": "Where?",
        }));
        store.insert_event(&event).unwrap();

        let events = store.get_events(&EventFilter::default()).unwrap();
        assert_eq!(events, vec![event], "{}", store.backend());
    }
}

#[test]
fn catalog_lists_distinct_sorted_values() {
    for store in backends() {
        let mut doc = entry("/b", "doc");
        doc.entry_type = EntryType::Doc;
        store.insert_entry(&doc).unwrap();
        store.insert_entry(&entry("/a", "fact one")).unwrap();
        store.insert_entry(&entry("/a", "fact two")).unwrap();

        assert_eq!(store.list_topics().unwrap(), vec!["/a", "/b"], "{}", store.backend());
        assert_eq!(
            store.list_entry_types().unwrap(),
            vec![EntryType::Doc, EntryType::Fact],
            "{}",
            store.backend()
        );
    }
}
