//! Room aggregate.
//!
//! A room owns its connection list, its session state and its attendance map.
//! All three are mutated together under the room's lock, so a timer start can
//! never interleave with a join half-way through.

use super::{
    attendance::{AttendanceTracker, Eligibility},
    connection::{Connection, ConnectionMultiplexer, ParticipantStatus, PresenceEntry},
    error::AttendanceError,
    event::RoomEvent,
    identity::Identity,
    message_pusher::PusherChannel,
    reward::{ClaimLedger, ClaimPolicy},
    session::{SessionState, TimerState},
    value_object::{AttendanceThreshold, ConnectionId, DurationMinutes, RoomId, Timestamp, UserId},
};

/// Where a room is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomLifecycle {
    /// Holds no connections and no session or attendance state
    Empty,
    /// At least one connection is open
    Active,
    /// No connections, but session or attendance state is retained
    Idle { since: Timestamp },
}

/// Result of registering a connection
#[derive(Debug)]
pub struct JoinOutcome {
    pub connection_id: ConnectionId,
    pub status: ParticipantStatus,
    /// Previous connection of the same identity, already unregistered
    pub evicted: Option<Connection>,
}

#[derive(Debug)]
pub struct Room {
    id: RoomId,
    connections: ConnectionMultiplexer,
    session: Option<SessionState>,
    attendance: AttendanceTracker,
    claims: ClaimLedger,
    created_at: Timestamp,
    vacated_at: Option<Timestamp>,
    retired: bool,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            connections: ConnectionMultiplexer::new(),
            session: None,
            attendance: AttendanceTracker::new(),
            claims: ClaimLedger::default(),
            created_at,
            vacated_at: None,
            retired: false,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    // ----- connections -----

    /// Register a new connection for `identity`.
    ///
    /// Evicts a previous connection of the same identity, derives the initial
    /// status from the timer state and records the join for attendance.
    pub fn connect(&mut self, identity: Identity, channel: PusherChannel, now: Timestamp) -> JoinOutcome {
        let session_active = self.is_session_active();
        let status = if session_active {
            ParticipantStatus::Focusing
        } else {
            ParticipantStatus::Idle
        };
        let user_id = identity.user_id;

        let connection = Connection::new(identity, status, channel, now);
        let connection_id = connection.id;
        let evicted = self.connections.register(connection);

        self.attendance.on_join(user_id, now, session_active);
        self.vacated_at = None;

        JoinOutcome {
            connection_id,
            status,
            evicted,
        }
    }

    /// Unregister a connection. Returns `false` if it was already gone.
    pub fn disconnect(&mut self, connection_id: ConnectionId, now: Timestamp) -> bool {
        let removed = self.connections.remove(connection_id).is_some();
        if removed {
            self.mark_vacated_if_empty(now);
        }
        removed
    }

    /// Drop connections that could not be reached
    pub fn prune(&mut self, connection_ids: &[ConnectionId], now: Timestamp) -> usize {
        let pruned = self.connections.prune(connection_ids);
        if pruned > 0 {
            self.mark_vacated_if_empty(now);
        }
        pruned
    }

    /// Drop connections whose outbound channel is already closed
    pub fn prune_closed(&mut self, now: Timestamp) -> Vec<ConnectionId> {
        let pruned = self.connections.prune_closed();
        if !pruned.is_empty() {
            self.mark_vacated_if_empty(now);
        }
        pruned
    }

    pub fn set_status(&mut self, identity: &Identity, status: ParticipantStatus) -> bool {
        self.connections.set_status(identity, status)
    }

    pub fn presence(&self) -> Vec<PresenceEntry> {
        self.connections.list_presence()
    }

    pub fn connections(&self) -> &[Connection] {
        self.connections.as_slice()
    }

    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(connection_id)
    }

    fn mark_vacated_if_empty(&mut self, now: Timestamp) {
        if self.connections.is_empty() {
            self.vacated_at = Some(now);
        }
    }

    // ----- timer -----

    /// Start a new session generation.
    ///
    /// Replaces the session wholesale, restarts attendance for everyone
    /// connected, marks every connection as focusing and forgets past claims.
    pub fn start_timer(&mut self, duration: DurationMinutes, now: Timestamp) -> SessionState {
        let session = SessionState::start(now, duration);
        self.session = Some(session);
        self.attendance
            .on_session_start(self.connections.connected_user_ids(), now);
        self.connections.set_all_status(ParticipantStatus::Focusing);
        self.claims.reset();
        session
    }

    /// SYNC_TIMER event for a late joiner, if the session is still running
    pub fn sync_event(&self, now: Timestamp) -> Option<RoomEvent> {
        self.session
            .filter(|session| session.is_running_at(now))
            .map(|session| RoomEvent::SyncTimer {
                end_time: session.end_time,
                duration: session.duration,
            })
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn timer_state(&self) -> TimerState {
        TimerState::of(self.session.as_ref())
    }

    fn is_session_active(&self) -> bool {
        self.timer_state() == TimerState::Focusing
    }

    // ----- attendance and claims -----

    pub fn attendance(&self) -> &AttendanceTracker {
        &self.attendance
    }

    pub fn eligibility(
        &self,
        user_id: UserId,
        now: Timestamp,
        threshold: AttendanceThreshold,
    ) -> Result<Eligibility, AttendanceError> {
        self.attendance
            .compute_eligibility(self.session.as_ref(), user_id, now, threshold)
    }

    pub fn claim_permitted(&self, policy: ClaimPolicy, user_id: UserId) -> bool {
        self.claims.permits(policy, user_id)
    }

    pub fn record_claim(&mut self, user_id: UserId) {
        self.claims.record(user_id);
    }

    // ----- lifecycle -----

    pub fn lifecycle(&self) -> RoomLifecycle {
        if !self.connections.is_empty() {
            return RoomLifecycle::Active;
        }
        if self.session.is_none() && self.attendance.is_empty() {
            return RoomLifecycle::Empty;
        }
        RoomLifecycle::Idle {
            since: self.vacated_at.unwrap_or(self.created_at),
        }
    }

    /// Whether the expiry policy allows discarding this room at `now`.
    ///
    /// An idle room is measured from the later of the moment it emptied and
    /// the end of its session, so a running session is never discarded.
    pub fn is_reapable(&self, now: Timestamp, idle_ttl_secs: i64) -> bool {
        match self.lifecycle() {
            RoomLifecycle::Active => false,
            RoomLifecycle::Empty => true,
            RoomLifecycle::Idle { since } => {
                let idle_from = match self.session {
                    Some(session) if session.end_time > since => session.end_time,
                    _ => since,
                };
                now.secs_since(idle_from) >= idle_ttl_secs as f64
            }
        }
    }

    /// Mark the room as removed from the registry
    pub fn retire(&mut self) {
        self.retired = true;
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }
}
