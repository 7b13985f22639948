//! Bidirectional registry of active pairs.

use std::collections::HashMap;

use super::client_id::ClientId;

/// Symmetric mapping from each paired client to its partner.
///
/// If `a -> b` is present then `b -> a` is present. Binding an
/// already-bound client is a programming error and panics.
#[derive(Debug, Default)]
pub struct PairRegistry {
    partners: HashMap<ClientId, ClientId>,
}

impl PairRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the symmetric binding `a <-> b`
    pub fn bind(&mut self, a: ClientId, b: ClientId) {
        assert!(a != b, "cannot pair client '{a}' with itself");
        assert!(
            !self.partners.contains_key(&a) && !self.partners.contains_key(&b),
            "bind requires both clients to be unbound"
        );
        self.partners.insert(a.clone(), b.clone());
        self.partners.insert(b, a);
    }

    pub fn partner_of(&self, client_id: &ClientId) -> Option<&ClientId> {
        self.partners.get(client_id)
    }

    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.partners.contains_key(client_id)
    }

    /// Remove both sides of the binding; returns the former partner
    pub fn unbind(&mut self, client_id: &ClientId) -> Option<ClientId> {
        let partner = self.partners.remove(client_id)?;
        self.partners.remove(&partner);
        Some(partner)
    }

    /// Number of active pairs
    pub fn pair_count(&self) -> usize {
        self.partners.len() / 2
    }

    /// Enumerate every `client -> partner` edge (each pair appears twice)
    pub fn iter(&self) -> impl Iterator<Item = (&ClientId, &ClientId)> {
        self.partners.iter()
    }
}
