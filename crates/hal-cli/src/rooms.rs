//! In-memory meeting-room catalogue served by `hal-example`.

use serde::Serialize;
use serde_json::Value;

pub const ROUTE: &str = "/api/meetingrooms";
pub const CONTROLLER: &str = "MeetingRooms";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingRoom {
    pub id: u32,
    pub name: &'static str,
    pub seats: u32,
}

const ROOMS: &[(&str, u32)] = &[
    ("Mercury", 10),
    ("Venus", 8),
    ("Earth", 15),
    ("Mars", 14),
    ("Jupiter", 30),
    ("Saturn", 25),
    ("Uranus", 18),
    ("Neptune", 20),
];

pub fn all() -> impl Iterator<Item = MeetingRoom> {
    ROOMS
        .iter()
        .zip(1..)
        .map(|(&(name, seats), id)| MeetingRoom { id, name, seats })
}

pub fn find(id: u32) -> Option<MeetingRoom> {
    all().find(|room| room.id == id)
}

/// Rooms whose name contains `fragment`, case-sensitively.
pub fn search(fragment: &str) -> Vec<MeetingRoom> {
    all().filter(|room| room.name.contains(fragment)).collect()
}

/// Path of the get-by-id route for an item id.
pub fn item_path(id: &Value) -> Option<String> {
    id.as_u64().map(|id| format!("{ROUTE}/get-by-id/{id}"))
}
