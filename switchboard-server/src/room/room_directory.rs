use indexmap::IndexSet;
use parking_lot::Mutex;
use std::collections::HashMap;
use switchboard_core::{PeerId, RoomId};
use tracing::info;

#[derive(Default)]
struct DirectoryInner {
    rooms: HashMap<RoomId, IndexSet<PeerId>>,
    memberships: HashMap<PeerId, RoomId>,
}

impl DirectoryInner {
    fn remove_member(&mut self, peer_id: &PeerId, room_id: &RoomId) {
        let Some(members) = self.rooms.get_mut(room_id) else {
            return;
        };
        members.shift_remove(peer_id);
        if members.is_empty() {
            self.rooms.remove(room_id);
            info!(room_id = %room_id, "Room is empty, dropping it");
        }
    }
}

/// Result of [`RoomDirectory::join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    /// Members right after the join, in join order, joiner included.
    pub members: Vec<PeerId>,
    /// Room the peer was moved out of, if it was in a different one.
    pub left: Option<RoomId>,
}

/// Room membership, both directions, behind one lock so that every
/// operation sees the forward and reverse maps agree.
///
/// A peer is in at most one room. Joining another room leaves the current
/// one first. Rooms are created on first join and dropped when the last
/// member leaves.
#[derive(Default)]
pub struct RoomDirectory {
    inner: Mutex<DirectoryInner>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self, peer_id: &PeerId, room_id: RoomId) -> Joined {
        let mut inner = self.inner.lock();

        let left = match inner.memberships.insert(peer_id.clone(), room_id.clone()) {
            Some(previous) if previous != room_id => {
                inner.remove_member(peer_id, &previous);
                Some(previous)
            }
            _ => None,
        };

        let members = inner.rooms.entry(room_id).or_default();
        members.insert(peer_id.clone());

        Joined {
            members: members.iter().cloned().collect(),
            left,
        }
    }

    /// Returns the room the peer was removed from, `None` if it was in none.
    pub fn leave(&self, peer_id: &PeerId) -> Option<RoomId> {
        let mut inner = self.inner.lock();
        let room_id = inner.memberships.remove(peer_id)?;
        inner.remove_member(peer_id, &room_id);
        Some(room_id)
    }

    /// Empty for unknown rooms.
    pub fn members_of(&self, room_id: &RoomId) -> Vec<PeerId> {
        self.inner
            .lock()
            .rooms
            .get(room_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn room_of(&self, peer_id: &PeerId) -> Option<RoomId> {
        self.inner.lock().memberships.get(peer_id).cloned()
    }

    pub fn room_count(&self) -> usize {
        self.inner.lock().rooms.len()
    }
}
