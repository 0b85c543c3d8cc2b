use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use socialq::data::{
    load_snapshot, save_snapshot, Interaction, InteractionType, Person, RelationshipType, Snapshot,
};

fn person(id: &str, name: &str, closeness: u8) -> Person {
    Person {
        id: id.to_owned(),
        name: name.to_owned(),
        nickname: None,
        relationship_type: RelationshipType::Friend,
        closeness_level: closeness,
        notes: None,
        birthday: None,
        last_interaction_at: None,
    }
}

fn interaction(id: &str, people: Vec<Person>) -> Interaction {
    Interaction {
        id: id.to_owned(),
        kind: InteractionType::InPerson,
        title: "Coffee".to_owned(),
        notes: Some("Had coffee downtown".to_owned()),
        sentiment: 4,
        location: Some("Blue Bottle".to_owned()),
        occurred_at: Utc.with_ymd_and_hms(2026, 1, 5, 16, 0, 0).unwrap(),
        people,
    }
}

#[test]
fn snapshot_round_trips_through_disk() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("socialq.json");

    let alice = person("p1", "Alice Johnson", 4);
    let snapshot = Snapshot {
        people: vec![alice.clone()],
        interactions: vec![interaction("i1", vec![alice])],
    };

    save_snapshot(&path, &snapshot)?;
    let loaded = load_snapshot(&path)?;

    assert_eq!(loaded.people.len(), 1);
    assert_eq!(loaded.people[0].name, "Alice Johnson");
    assert_eq!(loaded.people[0].closeness_level, 4);
    assert_eq!(loaded.interactions.len(), 1);
    let logged = &loaded.interactions[0];
    assert_eq!(logged.kind, InteractionType::InPerson);
    assert_eq!(logged.sentiment, 4);
    assert_eq!(logged.location.as_deref(), Some("Blue Bottle"));
    assert_eq!(logged.people.len(), 1);
    assert_eq!(logged.people[0].id, "p1");
    assert_eq!(logged.occurred_at, snapshot.interactions[0].occurred_at);
    Ok(())
}

#[test]
fn missing_snapshot_file_loads_empty() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let loaded = load_snapshot(&dir.path().join("nope.json"))?;
    assert!(loaded.people.is_empty());
    assert!(loaded.interactions.is_empty());
    Ok(())
}

#[test]
fn malformed_snapshot_is_a_contextual_error() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("socialq.json");
    std::fs::write(&path, "not json at all")?;

    let error = load_snapshot(&path).unwrap_err();
    assert!(error.to_string().contains("invalid snapshot JSON"));
    Ok(())
}

#[test]
fn stale_participants_are_dropped_on_load() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("socialq.json");

    let alice = person("p1", "Alice Johnson", 3);
    let ghost = person("p2", "Removed Contact", 3);
    let snapshot = Snapshot {
        people: vec![alice.clone()],
        interactions: vec![interaction("i1", vec![alice, ghost])],
    };

    save_snapshot(&path, &snapshot)?;
    let loaded = load_snapshot(&path)?;

    assert_eq!(loaded.interactions[0].people.len(), 1);
    assert_eq!(loaded.interactions[0].people[0].id, "p1");
    Ok(())
}

#[test]
fn out_of_range_ratings_are_clamped_on_load() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("socialq.json");

    let mut brother = person("p1", "Sam", 9);
    brother.relationship_type = RelationshipType::Family;
    let mut logged = interaction("i1", vec![brother.clone()]);
    logged.sentiment = 0;
    let snapshot = Snapshot {
        people: vec![brother],
        interactions: vec![logged],
    };

    save_snapshot(&path, &snapshot)?;
    let loaded = load_snapshot(&path)?;

    assert_eq!(loaded.people[0].closeness_level, 5);
    assert_eq!(loaded.interactions[0].sentiment, 1);
    Ok(())
}
