//! The matchmaking state machine.
//!
//! The dispatcher owns the waiting pool, the pair registry, the remembered
//! interests, and every client's session state. Inbound events are applied
//! one at a time against that state; each application returns the outbound
//! [`Emission`]s for the transport layer to deliver. The dispatcher itself
//! performs no I/O, so every lifecycle rule is unit-testable here.
//!
//! Events arriving for a client that is not in a valid state for them
//! (e.g. `send_message` while unpaired, `answer` aimed at a non-partner)
//! are dropped without a reply; the client only ever learns about failures
//! through the absence of progress or through `partner_disconnected`.

use std::collections::HashMap;

use serde_json::Value;

use crate::common::time::{Clock, MonotonicClock};
use crate::domain::{
    ClientId, Emission, Interests, MessageSender, OutboundEvent, PairRegistry, RANDOM_TAG,
    SessionState, WaitingEntry, WaitingPool, find_best_match,
};

/// Single-threaded matchmaking authority.
///
/// All mutation happens through the event methods below; the server holds
/// the dispatcher behind one mutex so no two events ever observe an
/// inconsistent view of the pool and registry.
pub struct Dispatcher {
    pool: WaitingPool,
    registry: PairRegistry,
    /// Last normalized interests per client, kept across pairings so a
    /// payload-less `skip` can reuse them; forgotten on leave/disconnect.
    interests_of: HashMap<ClientId, Interests>,
    sessions: HashMap<ClientId, SessionState>,
    clock: Box<dyn Clock>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::with_clock(Box::new(MonotonicClock::new()))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            pool: WaitingPool::new(),
            registry: PairRegistry::new(),
            interests_of: HashMap::new(),
            sessions: HashMap::new(),
            clock,
        }
    }

    /// Register a freshly connected client
    pub fn connect(&mut self, client_id: ClientId) {
        self.sessions.insert(client_id, SessionState::Unregistered);
    }

    /// Current lifecycle state; clients with no live connection are `Closed`
    pub fn session_state(&self, client_id: &ClientId) -> SessionState {
        self.sessions
            .get(client_id)
            .copied()
            .unwrap_or(SessionState::Closed)
    }

    /// Enter matchmaking with freshly declared interests.
    ///
    /// A paired client calling this first leaves its current pair (the
    /// partner is notified); a waiting client is re-enqueued with a new
    /// join time.
    pub fn find_partner(&mut self, client_id: &ClientId, interests: Interests) -> Vec<Emission> {
        if !self.sessions.contains_key(client_id) {
            tracing::debug!("Dropping find_partner from unknown client '{}'", client_id);
            return Vec::new();
        }
        let mut out = Vec::new();
        self.interests_of.insert(client_id.clone(), interests.clone());
        if self.session_state(client_id) == SessionState::Paired {
            self.teardown_pair(client_id, &mut out);
        }
        self.pool.remove_by_id(client_id);
        self.run_match(client_id, interests, &mut out);
        out
    }

    /// Relay a chat message to the partner and echo it back to the sender
    pub fn send_message(&mut self, client_id: &ClientId, text: String) -> Vec<Emission> {
        let Some(partner) = self.registry.partner_of(client_id).cloned() else {
            tracing::debug!("Dropping send_message from unpaired client '{}'", client_id);
            return Vec::new();
        };
        vec![
            Emission::new(
                partner,
                OutboundEvent::ReceiveMessage {
                    sender: MessageSender::Partner,
                    text: text.clone(),
                },
            ),
            Emission::new(
                client_id.clone(),
                OutboundEvent::ReceiveMessage {
                    sender: MessageSender::Me,
                    text,
                },
            ),
        ]
    }

    /// Forward an opaque media-session offer to the partner
    pub fn offer(&mut self, client_id: &ClientId, offer: Value) -> Vec<Emission> {
        let Some(partner) = self.registry.partner_of(client_id).cloned() else {
            tracing::debug!("Dropping offer from unpaired client '{}'", client_id);
            return Vec::new();
        };
        vec![Emission::new(
            partner,
            OutboundEvent::Offer {
                from: client_id.clone(),
                offer,
            },
        )]
    }

    /// Forward an opaque answer to `to`, which must be the current partner
    pub fn answer(&mut self, client_id: &ClientId, to: ClientId, answer: Value) -> Vec<Emission> {
        if self.registry.partner_of(client_id) != Some(&to) {
            tracing::debug!(
                "Dropping answer from '{}' addressed to non-partner '{}'",
                client_id,
                to
            );
            return Vec::new();
        }
        vec![Emission::new(
            to,
            OutboundEvent::Answer {
                from: client_id.clone(),
                answer,
            },
        )]
    }

    /// Forward an opaque ICE candidate to the partner
    pub fn ice_candidate(&mut self, client_id: &ClientId, candidate: Value) -> Vec<Emission> {
        let Some(partner) = self.registry.partner_of(client_id).cloned() else {
            tracing::debug!("Dropping ice-candidate from unpaired client '{}'", client_id);
            return Vec::new();
        };
        vec![Emission::new(
            partner,
            OutboundEvent::IceCandidate {
                from: client_id.clone(),
                candidate,
            },
        )]
    }

    /// Tell the partner that video stopped; no state change
    pub fn stop_video(&mut self, client_id: &ClientId) -> Vec<Emission> {
        let Some(partner) = self.registry.partner_of(client_id).cloned() else {
            tracing::debug!("Dropping stop_video from unpaired client '{}'", client_id);
            return Vec::new();
        };
        vec![Emission::new(partner, OutboundEvent::StopVideo)]
    }

    /// Leave the current pair and immediately look for a new partner.
    ///
    /// Only the skipper re-enters matchmaking; the skipped side gets
    /// `partner_disconnected` and decides for itself. Without a payload the
    /// previously declared interests are reused.
    pub fn skip(&mut self, client_id: &ClientId, interests: Option<Interests>) -> Vec<Emission> {
        if self.session_state(client_id) != SessionState::Paired {
            tracing::debug!("Dropping skip from unpaired client '{}'", client_id);
            return Vec::new();
        }
        let mut out = Vec::new();
        self.teardown_pair(client_id, &mut out);
        let interests = match interests {
            Some(interests) => {
                self.interests_of
                    .insert(client_id.clone(), interests.clone());
                interests
            }
            None => self
                .interests_of
                .get(client_id)
                .cloned()
                .unwrap_or_else(Interests::random),
        };
        self.run_match(client_id, interests, &mut out);
        out
    }

    /// Leave matchmaking entirely and forget the stored interests
    pub fn leave_chat(&mut self, client_id: &ClientId) -> Vec<Emission> {
        let mut out = Vec::new();
        match self.session_state(client_id) {
            SessionState::Paired => self.teardown_pair(client_id, &mut out),
            SessionState::Waiting => {
                self.pool.remove_by_id(client_id);
            }
            state @ (SessionState::Unregistered | SessionState::Closed) => {
                tracing::debug!("Dropping leaveChat from {} client '{}'", state, client_id);
                return out;
            }
        }
        self.interests_of.remove(client_id);
        self.sessions
            .insert(client_id.clone(), SessionState::Unregistered);
        out
    }

    /// The client's connection is gone: notify the partner if any and drop
    /// every reference to the client in one step.
    pub fn disconnect(&mut self, client_id: &ClientId) -> Vec<Emission> {
        let mut out = Vec::new();
        if self.registry.contains(client_id) {
            self.teardown_pair(client_id, &mut out);
        }
        self.pool.remove_by_id(client_id);
        self.interests_of.remove(client_id);
        self.sessions.remove(client_id);
        out
    }

    /// Number of live connections
    pub fn connected_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of clients waiting for a partner
    pub fn waiting_count(&self) -> usize {
        self.pool.len()
    }

    /// Number of active pairs
    pub fn pair_count(&self) -> usize {
        self.registry.pair_count()
    }

    /// Dissolve the caller's pair: the partner gets the final
    /// `partner_disconnected` and returns to `Unregistered`, awaiting its
    /// own next action. The caller's state is set by the caller.
    fn teardown_pair(&mut self, client_id: &ClientId, out: &mut Vec<Emission>) {
        if let Some(partner) = self.registry.unbind(client_id) {
            self.sessions
                .insert(partner.clone(), SessionState::Unregistered);
            out.push(Emission::new(partner, OutboundEvent::PartnerDisconnected));
        }
    }

    /// Run the matcher for `client_id`: either form a pair or enqueue
    fn run_match(&mut self, client_id: &ClientId, interests: Interests, out: &mut Vec<Emission>) {
        match find_best_match(&interests, client_id, &self.pool) {
            Some(entry) => {
                let partner_id = entry.client_id.clone();
                self.pool.remove_by_id(&partner_id);
                self.registry.bind(client_id.clone(), partner_id.clone());
                self.sessions.insert(client_id.clone(), SessionState::Paired);
                self.sessions.insert(partner_id.clone(), SessionState::Paired);
                out.push(Emission::new(
                    client_id.clone(),
                    OutboundEvent::PartnerFound {
                        partner_id: partner_id.clone(),
                    },
                ));
                out.push(Emission::new(
                    partner_id,
                    OutboundEvent::PartnerFound {
                        partner_id: client_id.clone(),
                    },
                ));
            }
            None => {
                self.pool.insert(WaitingEntry {
                    client_id: client_id.clone(),
                    interests: interests.clone(),
                    joined_at_nanos: self.clock.now_nanos(),
                });
                self.sessions
                    .insert(client_id.clone(), SessionState::Waiting);
                out.push(Emission::new(
                    client_id.clone(),
                    OutboundEvent::Waiting {
                        status: waiting_status(&interests),
                    },
                ));
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Status line sent with a `waiting` event
fn waiting_status(interests: &Interests) -> String {
    if interests.tags() == [RANDOM_TAG] {
        "Waiting for any available partner...".to_string()
    } else {
        format!(
            "Waiting for a partner interested in: {}",
            interests.tags().join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::ManualClock;

    fn id(s: &str) -> ClientId {
        ClientId::new(s)
    }

    /// Dispatcher on a manual clock, with the clock handle for advancing time
    fn dispatcher() -> (Dispatcher, ManualClock) {
        let clock = ManualClock::new();
        (Dispatcher::with_clock(Box::new(clock.clone())), clock)
    }

    /// Connect a client and have it look for a partner
    fn join(d: &mut Dispatcher, clock: &ManualClock, who: &str, tags: &str) -> Vec<Emission> {
        clock.advance(1);
        d.connect(id(who));
        d.find_partner(&id(who), Interests::parse(tags))
    }

    impl Dispatcher {
        /// Assert every reachable-state invariant of the core
        fn check_invariants(&self) {
            // registry symmetry
            for (a, b) in self.registry.iter() {
                assert_eq!(self.registry.partner_of(b), Some(a), "registry asymmetric");
                assert_eq!(
                    self.session_state(a),
                    SessionState::Paired,
                    "bound client not paired"
                );
            }
            // pool and registry are disjoint; pool entries are waiting
            for entry in self.pool.iter() {
                assert!(
                    !self.registry.contains(&entry.client_id),
                    "client both pooled and paired"
                );
                assert_eq!(self.session_state(&entry.client_id), SessionState::Waiting);
            }
            // pool has no duplicates and non-decreasing join times
            let entries: Vec<_> = self.pool.iter().collect();
            for (i, entry) in entries.iter().enumerate() {
                for later in &entries[i + 1..] {
                    assert_ne!(entry.client_id, later.client_id, "duplicate pool entry");
                    assert!(
                        entry.joined_at_nanos <= later.joined_at_nanos,
                        "pool join times decrease"
                    );
                }
            }
        }
    }

    #[test]
    fn test_connected_client_starts_unregistered() {
        // given:
        let (mut d, _clock) = dispatcher();

        // when:
        d.connect(id("a"));

        // then:
        assert_eq!(d.session_state(&id("a")), SessionState::Unregistered);
        assert_eq!(d.connected_count(), 1);
    }

    #[test]
    fn test_first_seeker_waits() {
        // given:
        let (mut d, clock) = dispatcher();

        // when:
        let out = join(&mut d, &clock, "a", "music");

        // then:
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].to, id("a"));
        assert!(matches!(out[0].event, OutboundEvent::Waiting { .. }));
        assert_eq!(d.session_state(&id("a")), SessionState::Waiting);
        assert_eq!(d.waiting_count(), 1);
        d.check_invariants();
    }

    #[test]
    fn test_exact_interest_pair() {
        // given: a waits on "music"
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");

        // when: b declares the same interest, differently cased
        let out = join(&mut d, &clock, "b", "Music");

        // then: both sides learn the counterpart's id, pool is empty
        assert_eq!(
            out,
            vec![
                Emission::new(id("b"), OutboundEvent::PartnerFound { partner_id: id("a") }),
                Emission::new(id("a"), OutboundEvent::PartnerFound { partner_id: id("b") }),
            ]
        );
        assert_eq!(d.session_state(&id("a")), SessionState::Paired);
        assert_eq!(d.session_state(&id("b")), SessionState::Paired);
        assert_eq!(d.waiting_count(), 0);
        assert_eq!(d.pair_count(), 1);
        d.check_invariants();
    }

    #[test]
    fn test_best_match_wins_over_fifo() {
        // given: x waits first with one matching tag, y later with two
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "x", "music");
        join(&mut d, &clock, "y", "music,movies");

        // when:
        let out = join(&mut d, &clock, "c", "music,movies");

        // then: larger overlap beats longer wait
        assert_eq!(
            out[0],
            Emission::new(id("c"), OutboundEvent::PartnerFound { partner_id: id("y") })
        );
        assert_eq!(d.session_state(&id("x")), SessionState::Waiting);
        d.check_invariants();
    }

    #[test]
    fn test_equal_overlap_pairs_with_longest_waiting() {
        // given:
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "x", "music");
        join(&mut d, &clock, "y", "music");

        // when:
        let out = join(&mut d, &clock, "c", "music");

        // then: x has waited longest
        assert_eq!(
            out[0],
            Emission::new(id("c"), OutboundEvent::PartnerFound { partner_id: id("x") })
        );
        d.check_invariants();
    }

    #[test]
    fn test_random_only_pairs_with_random() {
        // given: x waits on a topic
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "x", "music");

        // when: c has no preference (empty input normalizes to random)
        let out = join(&mut d, &clock, "c", "");

        // then: no match; random is not a wildcard over topics
        assert!(matches!(out[0].event, OutboundEvent::Waiting { .. }));
        assert_eq!(d.waiting_count(), 2);

        // when: d declares random too
        let out = join(&mut d, &clock, "d", "random");

        // then: the two no-preference clients pair up
        assert_eq!(
            out[0],
            Emission::new(id("d"), OutboundEvent::PartnerFound { partner_id: id("c") })
        );
        assert_eq!(d.session_state(&id("x")), SessionState::Waiting);
        d.check_invariants();
    }

    #[test]
    fn test_message_echo() {
        // given:
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");
        join(&mut d, &clock, "b", "music");

        // when:
        let out = d.send_message(&id("a"), "hello".to_string());

        // then: exactly two emissions with identical text, partner first
        assert_eq!(
            out,
            vec![
                Emission::new(
                    id("b"),
                    OutboundEvent::ReceiveMessage {
                        sender: MessageSender::Partner,
                        text: "hello".to_string(),
                    }
                ),
                Emission::new(
                    id("a"),
                    OutboundEvent::ReceiveMessage {
                        sender: MessageSender::Me,
                        text: "hello".to_string(),
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_message_from_unpaired_client_is_dropped() {
        // given:
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");

        // when:
        let out = d.send_message(&id("a"), "anyone there?".to_string());

        // then:
        assert!(out.is_empty());
    }

    #[test]
    fn test_offer_is_relayed_with_sender_id() {
        // given:
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");
        join(&mut d, &clock, "b", "music");

        // when:
        let payload = serde_json::json!({"sdp": "v=0..."});
        let out = d.offer(&id("a"), payload.clone());

        // then: the payload passes through untouched, tagged with the caller
        assert_eq!(
            out,
            vec![Emission::new(
                id("b"),
                OutboundEvent::Offer {
                    from: id("a"),
                    offer: payload,
                }
            )]
        );
    }

    #[test]
    fn test_answer_to_partner_is_relayed() {
        // given:
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");
        join(&mut d, &clock, "b", "music");

        // when: b answers the offer it got from a
        let payload = serde_json::json!({"sdp": "v=0..."});
        let out = d.answer(&id("b"), id("a"), payload.clone());

        // then:
        assert_eq!(
            out,
            vec![Emission::new(
                id("a"),
                OutboundEvent::Answer {
                    from: id("b"),
                    answer: payload,
                }
            )]
        );
    }

    #[test]
    fn test_answer_to_non_partner_is_dropped() {
        // given: a-b are paired, x is a bystander
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");
        join(&mut d, &clock, "b", "music");
        join(&mut d, &clock, "x", "books");

        // when:
        let out = d.answer(&id("b"), id("x"), serde_json::json!({}));

        // then:
        assert!(out.is_empty());
    }

    #[test]
    fn test_ice_candidate_is_relayed_with_sender_id() {
        // given:
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");
        join(&mut d, &clock, "b", "music");

        // when:
        let payload = serde_json::json!({"candidate": "candidate:0 1 UDP ..."});
        let out = d.ice_candidate(&id("b"), payload.clone());

        // then:
        assert_eq!(
            out,
            vec![Emission::new(
                id("a"),
                OutboundEvent::IceCandidate {
                    from: id("b"),
                    candidate: payload,
                }
            )]
        );
    }

    #[test]
    fn test_stop_video_reaches_partner_only() {
        // given:
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");
        join(&mut d, &clock, "b", "music");

        // when:
        let out = d.stop_video(&id("a"));

        // then:
        assert_eq!(out, vec![Emission::new(id("b"), OutboundEvent::StopVideo)]);
        assert_eq!(d.session_state(&id("a")), SessionState::Paired);
        assert_eq!(d.session_state(&id("b")), SessionState::Paired);
    }

    #[test]
    fn test_skip_rematches_initiator_only() {
        // given: a-b paired
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");
        join(&mut d, &clock, "b", "music");

        // when: a skips with new interests
        let out = d.skip(&id("a"), Some(Interests::parse("games")));

        // then: b is told and left out of matchmaking, a waits on games
        assert_eq!(
            out,
            vec![
                Emission::new(id("b"), OutboundEvent::PartnerDisconnected),
                Emission::new(
                    id("a"),
                    OutboundEvent::Waiting {
                        status: "Waiting for a partner interested in: games".to_string(),
                    }
                ),
            ]
        );
        assert_eq!(d.session_state(&id("b")), SessionState::Unregistered);
        assert_eq!(d.session_state(&id("a")), SessionState::Waiting);
        assert_eq!(d.waiting_count(), 1);
        assert!(!d.pool.contains(&id("b")));
        d.check_invariants();
    }

    #[test]
    fn test_skip_can_pair_immediately_from_pool() {
        // given: a-b paired, x waiting on games
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");
        join(&mut d, &clock, "b", "music");
        join(&mut d, &clock, "x", "games");

        // when:
        let out = d.skip(&id("a"), Some(Interests::parse("games")));

        // then: the old partner is notified first, then the new pair forms
        assert_eq!(
            out,
            vec![
                Emission::new(id("b"), OutboundEvent::PartnerDisconnected),
                Emission::new(id("a"), OutboundEvent::PartnerFound { partner_id: id("x") }),
                Emission::new(id("x"), OutboundEvent::PartnerFound { partner_id: id("a") }),
            ]
        );
        assert_eq!(d.pair_count(), 1);
        d.check_invariants();
    }

    #[test]
    fn test_skip_without_payload_reuses_remembered_interests() {
        // given: a found b via "music,movies"
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music,movies");
        join(&mut d, &clock, "b", "music");

        // when:
        clock.advance(1);
        let out = d.skip(&id("a"), None);

        // then: a re-enters the queue under the same interests
        assert!(matches!(out[1].event, OutboundEvent::Waiting { .. }));
        let entry = d.pool.iter().next().unwrap();
        assert_eq!(entry.client_id, id("a"));
        assert_eq!(entry.interests, Interests::parse("music,movies"));
        d.check_invariants();
    }

    #[test]
    fn test_skip_while_waiting_is_dropped() {
        // given:
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");

        // when:
        let out = d.skip(&id("a"), None);

        // then: nothing happens; a keeps waiting
        assert!(out.is_empty());
        assert_eq!(d.session_state(&id("a")), SessionState::Waiting);
        assert_eq!(d.waiting_count(), 1);
    }

    #[test]
    fn test_leave_while_waiting_forgets_everything() {
        // given:
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");

        // when:
        let out = d.leave_chat(&id("a"));

        // then: no notifications, pool emptied, interests forgotten
        assert!(out.is_empty());
        assert_eq!(d.session_state(&id("a")), SessionState::Unregistered);
        assert_eq!(d.waiting_count(), 0);
        assert!(!d.interests_of.contains_key(&id("a")));
        d.check_invariants();
    }

    #[test]
    fn test_leave_while_paired_notifies_partner() {
        // given:
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");
        join(&mut d, &clock, "b", "music");

        // when:
        let out = d.leave_chat(&id("a"));

        // then: b gets the final event; neither side is re-queued
        assert_eq!(
            out,
            vec![Emission::new(id("b"), OutboundEvent::PartnerDisconnected)]
        );
        assert_eq!(d.session_state(&id("a")), SessionState::Unregistered);
        assert_eq!(d.session_state(&id("b")), SessionState::Unregistered);
        assert_eq!(d.pair_count(), 0);
        assert_eq!(d.waiting_count(), 0);
        d.check_invariants();
    }

    #[test]
    fn test_leave_while_unregistered_is_dropped() {
        // given:
        let (mut d, _clock) = dispatcher();
        d.connect(id("a"));

        // when:
        let out = d.leave_chat(&id("a"));

        // then:
        assert!(out.is_empty());
        assert_eq!(d.session_state(&id("a")), SessionState::Unregistered);
    }

    #[test]
    fn test_skip_interests_survive_leave_does_not() {
        // given: a paired via "music", then leaves
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");
        join(&mut d, &clock, "b", "music");
        d.leave_chat(&id("a"));

        // then: leave is a clean reset
        assert!(!d.interests_of.contains_key(&id("a")));

        // when: a pairs again and skips without a payload
        join(&mut d, &clock, "c", "books");
        d.find_partner(&id("a"), Interests::parse("books"));
        clock.advance(1);
        d.skip(&id("a"), None);

        // then: skip kept the interests declared before it
        assert_eq!(
            d.interests_of.get(&id("a")),
            Some(&Interests::parse("books"))
        );
        d.check_invariants();
    }

    #[test]
    fn test_disconnect_mid_pair() {
        // given:
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");
        join(&mut d, &clock, "b", "music");

        // when: a's transport drops
        let out = d.disconnect(&id("a"));

        // then: b is notified; no state references a anywhere
        assert_eq!(
            out,
            vec![Emission::new(id("b"), OutboundEvent::PartnerDisconnected)]
        );
        assert_eq!(d.session_state(&id("a")), SessionState::Closed);
        assert_eq!(d.session_state(&id("b")), SessionState::Unregistered);
        assert_eq!(d.pair_count(), 0);
        assert_eq!(d.waiting_count(), 0);
        assert!(!d.interests_of.contains_key(&id("a")));
        assert_eq!(d.connected_count(), 1);
        d.check_invariants();
    }

    #[test]
    fn test_disconnect_while_waiting_cleans_the_pool() {
        // given:
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");

        // when:
        let out = d.disconnect(&id("a"));

        // then:
        assert!(out.is_empty());
        assert_eq!(d.waiting_count(), 0);
        assert_eq!(d.connected_count(), 0);
        d.check_invariants();
    }

    #[test]
    fn test_events_after_disconnect_are_dropped() {
        // given:
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");
        d.disconnect(&id("a"));

        // when: a stale find_partner arrives for the closed client
        let out = d.find_partner(&id("a"), Interests::parse("music"));

        // then: nothing is enqueued for a ghost
        assert!(out.is_empty());
        assert_eq!(d.waiting_count(), 0);
        d.check_invariants();
    }

    #[test]
    fn test_find_partner_while_paired_leaves_current_pair() {
        // given: a-b paired, x waiting on books
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");
        join(&mut d, &clock, "b", "music");
        join(&mut d, &clock, "x", "books");

        // when: a starts over with different interests
        let out = d.find_partner(&id("a"), Interests::parse("books"));

        // then: b is dropped from the pair, a pairs with x
        assert_eq!(out[0], Emission::new(id("b"), OutboundEvent::PartnerDisconnected));
        assert_eq!(
            out[1],
            Emission::new(id("a"), OutboundEvent::PartnerFound { partner_id: id("x") })
        );
        assert_eq!(d.session_state(&id("b")), SessionState::Unregistered);
        d.check_invariants();
    }

    #[test]
    fn test_find_partner_while_waiting_requeues_with_new_interests() {
        // given:
        let (mut d, clock) = dispatcher();
        join(&mut d, &clock, "a", "music");

        // when:
        clock.advance(1);
        let out = d.find_partner(&id("a"), Interests::parse("books"));

        // then: exactly one pool entry, carrying the new interests
        assert!(matches!(out[0].event, OutboundEvent::Waiting { .. }));
        assert_eq!(d.waiting_count(), 1);
        let entry = d.pool.iter().next().unwrap();
        assert_eq!(entry.interests, Interests::parse("books"));
        d.check_invariants();
    }

    #[test]
    fn test_waiting_status_wording() {
        // given / when / then:
        assert_eq!(
            waiting_status(&Interests::parse("music,movies")),
            "Waiting for a partner interested in: music, movies"
        );
        assert_eq!(
            waiting_status(&Interests::random()),
            "Waiting for any available partner..."
        );
    }

    #[test]
    fn test_invariants_hold_across_a_busy_sequence() {
        // given:
        let (mut d, clock) = dispatcher();

        // when / then: invariants hold after every step
        join(&mut d, &clock, "a", "music");
        d.check_invariants();
        join(&mut d, &clock, "b", "music,movies");
        d.check_invariants();
        join(&mut d, &clock, "c", "movies");
        d.check_invariants();
        join(&mut d, &clock, "e", "random");
        d.check_invariants();
        d.skip(&id("a"), Some(Interests::parse("movies")));
        d.check_invariants();
        d.leave_chat(&id("c"));
        d.check_invariants();
        d.disconnect(&id("b"));
        d.check_invariants();
        join(&mut d, &clock, "f", "random");
        d.check_invariants();
    }
}
