use std::str::FromStr;

use game_core::{
    Change, GameConfig, Item, ItemId, MapDimensions, Player, PlayerClass, PlayerId, Position,
    Snapshot, Team, TileFlag, TileOverride,
};
use serde_json::Value;

use super::event::{FeedEvent, FightNotice, UpdateBatch};
use super::wire::{
    Envelope, WireFight, WireItem, WireItemChange, WirePlayer, WirePlayerChange, WireSnapshot,
    WireTile, WireUpdate, integer,
};

/// Why a feed payload could not be turned into an event.
///
/// Callers log these and carry on with the next message.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("feed payload is not a JSON envelope")]
    InvalidJson(#[source] serde_json::Error),

    #[error("feed payload has no MessageType")]
    MissingMessageType,

    #[error("snapshot is malformed: {0}")]
    MalformedSnapshot(String),

    #[error("fight notice is malformed: {0}")]
    MalformedFight(String),
}

/// Decodes one feed payload.
///
/// Update records that lack a field are dropped one by one; the rest of the
/// batch still applies.
pub fn parse_event(raw: &str) -> Result<FeedEvent, FeedError> {
    let envelope: Envelope = serde_json::from_str(raw).map_err(FeedError::InvalidJson)?;
    let message_type = envelope
        .message_type
        .filter(|kind| !kind.is_empty())
        .ok_or(FeedError::MissingMessageType)?;
    let message = envelope.message.unwrap_or(Value::Null);

    let event = match message_type.as_str() {
        "ping" => FeedEvent::Ping,
        "Connection" => parse_connection(message)?,
        "Update" => FeedEvent::Update(parse_update(message)),
        "Fight" => FeedEvent::Fight(parse_fight(message)?),
        "Phase" => FeedEvent::Phase(text_of(unwrap_payload(message))),
        other => FeedEvent::Unknown(other.to_string()),
    };
    Ok(event)
}

/// Peels nested `{MessageType, Message}` envelopes, decoding JSON strings on
/// the way, until a payload without one is reached.
fn unwrap_payload(message: Value) -> Value {
    let mut current = decode_text(message);
    for _ in 0..GameConfig::MAX_ENVELOPE_DEPTH {
        current = match current {
            Value::Object(mut map) if is_envelope(&map) => {
                decode_text(map.remove("Message").unwrap_or(Value::Null))
            }
            other => return other,
        };
    }
    current
}

fn is_envelope(map: &serde_json::Map<String, Value>) -> bool {
    map.contains_key("Message")
        && !map.contains_key("PlayerChanges")
        && !map.contains_key("ItemChanges")
}

fn decode_text(value: Value) -> Value {
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(parsed @ Value::Object(_)) => parsed,
            _ => Value::String(text),
        },
        other => other,
    }
}

fn text_of(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_connection(message: Value) -> Result<FeedEvent, FeedError> {
    match unwrap_payload(message) {
        payload @ Value::Object(_) => parse_snapshot(payload).map(FeedEvent::Connected),
        other => Ok(FeedEvent::Waiting(text_of(other))),
    }
}

fn parse_snapshot(payload: Value) -> Result<Snapshot, FeedError> {
    let malformed = FeedError::MalformedSnapshot;
    let wire: WireSnapshot =
        serde_json::from_value(payload).map_err(|err| malformed(err.to_string()))?;

    let width = wire
        .map_width
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| malformed("missing or negative MapWidth".into()))?;
    let height = wire
        .map_height
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| malformed("missing or negative MapHeight".into()))?;

    let mut snapshot = Snapshot::new(MapDimensions::new(width, height));
    for (index, tile) in wire.tiles.unwrap_or_default().into_iter().enumerate() {
        snapshot
            .tiles
            .push(tile_override(tile).ok_or_else(|| malformed(format!("tile #{index}")))?);
    }
    for (index, player) in wire.players.unwrap_or_default().into_iter().enumerate() {
        snapshot
            .players
            .push(player_record(player).ok_or_else(|| malformed(format!("player #{index}")))?);
    }
    for (index, item) in wire.items.unwrap_or_default().into_iter().enumerate() {
        snapshot
            .items
            .push(item_record(item).ok_or_else(|| malformed(format!("item #{index}")))?);
    }
    Ok(snapshot)
}

fn position(x: Option<i64>, y: Option<i64>) -> Option<Position> {
    Some(Position::new(
        i32::try_from(x?).ok()?,
        i32::try_from(y?).ok()?,
    ))
}

fn team(code: Option<i64>) -> Option<Team> {
    Team::from_code(code.unwrap_or(0))
}

fn tile_override(tile: WireTile) -> Option<TileOverride> {
    Some(TileOverride::new(
        position(tile.x, tile.y)?,
        TileFlag::from_code(tile.flag.unwrap_or(0))?,
        team(tile.team)?,
    ))
}

/// Class names or the numeric codes older rooms send.
fn player_class(value: &Value) -> Option<PlayerClass> {
    if let Value::String(name) = value {
        if let Ok(class) = PlayerClass::from_str(name.trim()) {
            return Some(class);
        }
    }
    match integer(value)? {
        0 => Some(PlayerClass::Fighter),
        1 => Some(PlayerClass::Ranger),
        2 => Some(PlayerClass::Thief),
        _ => None,
    }
}

fn player_record(player: WirePlayer) -> Option<Player> {
    let record = Player::new(
        PlayerId::new(player.id?),
        player.name.unwrap_or_default(),
        player_class(player.class.as_ref()?)?,
        team(player.team)?,
        position(player.x, player.y)?,
    );
    Some(match player.item.and_then(|item| item.id) {
        Some(item) => record.with_item(ItemId::new(item)),
        None => record,
    })
}

fn item_record(item: WireItem) -> Option<Item> {
    Some(Item::new(
        ItemId::new(item.id?),
        item.name.unwrap_or_default(),
        position(item.x, item.y)?,
    ))
}

fn parse_update(message: Value) -> UpdateBatch {
    let wire: WireUpdate = match serde_json::from_value(unwrap_payload(message)) {
        Ok(wire) => wire,
        Err(err) => {
            tracing::warn!(error = %err, "dropping update without change collections");
            return UpdateBatch::default();
        }
    };

    let mut batch = UpdateBatch::default();
    for (key, raw) in wire.player_changes.unwrap_or_default() {
        match player_change(&key, raw) {
            Some((change, carried)) => {
                if let Some(item) = carried {
                    batch.carried.push((PlayerId::new(change.entity.id()), item));
                }
                batch.changes.push(change);
            }
            None => tracing::warn!(key = %key, "dropping incomplete player change"),
        }
    }
    for (key, raw) in wire.item_changes.unwrap_or_default() {
        match item_change(&key, raw) {
            Some(change) => batch.changes.push(change),
            None => tracing::warn!(key = %key, "dropping incomplete item change"),
        }
    }
    batch
}

fn player_change(key: &str, raw: Value) -> Option<(Change, Option<ItemId>)> {
    let wire: WirePlayerChange = serde_json::from_value(raw).ok()?;
    let id = wire.id.unwrap_or_else(|| key.to_string());
    if id.is_empty() {
        return None;
    }
    let change = Change::player(
        PlayerId::new(id),
        position(wire.prev_x, wire.prev_y)?,
        position(wire.x, wire.y)?,
    );
    Some((change, wire.item_id.map(ItemId::new)))
}

fn item_change(key: &str, raw: Value) -> Option<Change> {
    let wire: WireItemChange = serde_json::from_value(raw).ok()?;
    let id = wire.item_id.unwrap_or_else(|| key.to_string());
    if id.is_empty() {
        return None;
    }
    Some(Change::item(
        ItemId::new(id),
        position(wire.prev_x, wire.prev_y)?,
        position(wire.x, wire.y)?,
    ))
}

fn parse_fight(message: Value) -> Result<FightNotice, FeedError> {
    let wire: WireFight = serde_json::from_value(unwrap_payload(message))
        .map_err(|err| FeedError::MalformedFight(err.to_string()))?;
    let attacker = wire
        .attacker_id
        .ok_or_else(|| FeedError::MalformedFight("missing AttackerId".into()))?;
    let defender = wire
        .defender_id
        .ok_or_else(|| FeedError::MalformedFight("missing DefenderId".into()))?;
    Ok(FightNotice {
        id: wire.id,
        attacker: PlayerId::new(attacker),
        defender: PlayerId::new(defender),
    })
}

#[cfg(test)]
mod tests {
    use game_core::EntityRef;
    use serde_json::json;

    use super::*;

    fn envelope(kind: &str, message: Value) -> String {
        json!({"MessageType": kind, "Message": message}).to_string()
    }

    #[test]
    fn ping_and_unknown_types() {
        assert_eq!(parse_event(r#"{"MessageType":"ping"}"#).ok(), Some(FeedEvent::Ping));
        assert_eq!(
            parse_event(&envelope("PlayerConnected", json!("x"))).ok(),
            Some(FeedEvent::Unknown("PlayerConnected".into()))
        );
        assert!(matches!(
            parse_event(r#"{"Message":1}"#),
            Err(FeedError::MissingMessageType)
        ));
        assert!(matches!(parse_event("data: nope"), Err(FeedError::InvalidJson(_))));
    }

    #[test]
    fn connection_builds_snapshot() {
        let raw = envelope(
            "Connection",
            json!({
                "MapWidth": 5,
                "MapHeight": "4",
                "Tiles": [{"X": 3, "Y": 3, "Flag": 2, "Team": 2}],
                "Players": [
                    {"X": 0, "Y": 0, "Id": "aaaaa", "Name": "Ann", "Class": "Fighter", "Team": 1},
                    {"X": "4", "Y": 3, "Id": "bbbbb", "Name": "Bo", "Class": "Rogue", "Team": 2,
                     "Item": {"Id": "i9", "Name": "Ham"}}
                ],
                "Items": [{"Id": "i1", "Name": "Ham", "X": 3, "Y": 3}]
            }),
        );
        let Ok(FeedEvent::Connected(snapshot)) = parse_event(&raw) else {
            panic!("expected snapshot");
        };
        assert_eq!(snapshot.dimensions, MapDimensions::new(5, 4));
        assert_eq!(snapshot.tiles[0].flag, TileFlag::TreasureChest);
        assert_eq!(snapshot.tiles[0].team, Team::Team2);
        assert_eq!(snapshot.players[1].class, PlayerClass::Thief);
        assert_eq!(snapshot.players[1].position, Position::new(4, 3));
        assert_eq!(snapshot.players[1].carried_item, Some(ItemId::new("i9")));
        assert_eq!(snapshot.items[0].name, "Ham");
    }

    #[test]
    fn connection_string_is_a_waiting_notice() {
        let raw = envelope("Connection", json!("Connected to the room abcde"));
        assert_eq!(
            parse_event(&raw).ok(),
            Some(FeedEvent::Waiting("Connected to the room abcde".into()))
        );
    }

    #[test]
    fn snapshot_with_bad_record_is_rejected() {
        let raw = envelope(
            "Connection",
            json!({"MapWidth": 3, "MapHeight": 3, "Players": [{"X": 0, "Y": 0, "Class": "Fighter"}]}),
        );
        assert!(matches!(parse_event(&raw), Err(FeedError::MalformedSnapshot(_))));
    }

    #[test]
    fn nested_update_drops_incomplete_records() {
        let inner = json!({
            "MessageType": "Update",
            "Message": {
                "PlayerChanges": {
                    "aaaaa": {"X": 1, "Y": "0", "PrevX": 0, "PrevY": 0, "ItemId": "i1"},
                    "bbbbb": {"X": 1, "Y": 0, "PrevX": 0}
                },
                "ItemChanges": {
                    "i1": {"X": -1, "Y": -1, "PrevX": 1, "PrevY": 0, "ItemId": "i1"}
                }
            }
        });
        let raw = envelope("Update", Value::String(inner.to_string()));
        let Ok(FeedEvent::Update(batch)) = parse_event(&raw) else {
            panic!("expected update");
        };
        assert_eq!(batch.changes.len(), 2);
        assert_eq!(
            batch.changes[0],
            Change::player(PlayerId::new("aaaaa"), Position::new(0, 0), Position::new(1, 0))
        );
        assert_eq!(batch.changes[1].entity, EntityRef::Item(ItemId::new("i1")));
        assert!(batch.changes[1].is_removal());
        assert_eq!(batch.carried, vec![(PlayerId::new("aaaaa"), ItemId::new("i1"))]);
    }

    #[test]
    fn update_without_collections_is_empty() {
        let raw = envelope("Update", json!("not json"));
        assert_eq!(
            parse_event(&raw).ok(),
            Some(FeedEvent::Update(UpdateBatch::default()))
        );
    }

    #[test]
    fn fight_notice_from_json_string() {
        let fight = json!({
            "Id": "f1234",
            "Type": "OddEven",
            "AttackerId": "aaaaa",
            "DefenderId": "bbbbb"
        });
        let raw = envelope("Fight", Value::String(fight.to_string()));
        let Ok(FeedEvent::Fight(notice)) = parse_event(&raw) else {
            panic!("expected fight");
        };
        assert_eq!(notice.id.as_deref(), Some("f1234"));
        assert_eq!(
            notice.opponent_of(&PlayerId::new("bbbbb")),
            Some(&PlayerId::new("aaaaa"))
        );

        let raw = envelope("Fight", json!({"AttackerId": "aaaaa"}));
        assert!(matches!(parse_event(&raw), Err(FeedError::MalformedFight(_))));
    }

    #[test]
    fn phase_is_plain_text() {
        assert_eq!(
            parse_event(&envelope("Phase", json!("Attack"))).ok(),
            Some(FeedEvent::Phase("Attack".into()))
        );
    }
}
