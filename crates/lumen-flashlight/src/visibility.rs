//! Per-recipient redaction of other players' lights from network snapshots.
//!
//! Runs once per recipient per snapshot build, independently of the tick.
//! Only reads session lights; never creates or removes them.

use std::collections::HashSet;

use crate::host::{EntityHandle, LightWorld, PlayerId};
use crate::session::SessionRegistry;

/// Entities the host is about to transmit to one recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransmitInfo {
    /// Receiving player, `None` for slots without a controller.
    pub recipient: Option<PlayerId>,
    /// Entities that will be sent. Redaction removes from this set.
    pub entities: HashSet<EntityHandle>,
}

impl TransmitInfo {
    #[must_use]
    pub fn new(recipient: PlayerId, entities: impl IntoIterator<Item = EntityHandle>) -> Self {
        Self {
            recipient: Some(recipient),
            entities: entities.into_iter().collect(),
        }
    }
}

/// Removes lights owned by other sessions from a recipient's entity set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilityFilter;

impl VisibilityFilter {
    /// Redact for a single recipient. Returns how many entities were removed.
    ///
    /// The recipient's own light is never removed. Lights whose handle is no
    /// longer valid are skipped.
    pub fn redact(
        &self,
        registry: &SessionRegistry,
        recipient: PlayerId,
        entities: &mut HashSet<EntityHandle>,
        world: &impl LightWorld,
    ) -> usize {
        let mut removed = 0;
        for (owner, session) in registry.iter() {
            if owner == recipient {
                continue;
            }
            let Some(light) = &session.light else {
                continue;
            };
            if !light.is_valid(world) {
                continue;
            }
            if entities.remove(&light.handle()) {
                removed += 1;
            }
        }
        removed
    }

    /// Redact every recipient in a snapshot build. Entries without a
    /// recipient are left untouched.
    pub fn redact_all(
        &self,
        registry: &SessionRegistry,
        infos: &mut [TransmitInfo],
        world: &impl LightWorld,
    ) -> usize {
        let mut removed = 0;
        for info in infos.iter_mut() {
            if let Some(recipient) = info.recipient {
                removed += self.redact(registry, recipient, &mut info.entities, world);
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::AttachmentLifecycle;
    use crate::sim::SimHost;

    fn two_lit_players() -> (SimHost, SessionRegistry, EntityHandle, EntityHandle) {
        let mut host = SimHost::new();
        let a = host.add_player(1);
        let b = host.add_player(2);
        let lifecycle = AttachmentLifecycle::default();
        let mut registry = SessionRegistry::new();
        lifecycle.create(a, registry.get_or_create(a), &mut host);
        lifecycle.create(b, registry.get_or_create(b), &mut host);
        let la = registry.get(a).unwrap().light.as_ref().unwrap().handle();
        let lb = registry.get(b).unwrap().light.as_ref().unwrap().handle();
        (host, registry, la, lb)
    }

    fn cleanup(registry: &mut SessionRegistry, host: &mut SimHost) {
        for (_, mut session) in registry.remove_all() {
            AttachmentLifecycle::destroy(&mut session, host);
        }
    }

    #[test]
    fn test_other_light_removed_own_light_kept() {
        let (mut host, mut registry, la, lb) = two_lit_players();
        let mut entities: HashSet<_> = [la, lb, EntityHandle(999)].into_iter().collect();

        let removed = VisibilityFilter.redact(&registry, PlayerId(1), &mut entities, &host);
        assert_eq!(removed, 1);
        assert!(entities.contains(&la));
        assert!(!entities.contains(&lb));
        assert!(entities.contains(&EntityHandle(999)));

        cleanup(&mut registry, &mut host);
    }

    #[test]
    fn test_invalid_light_is_skipped() {
        let (mut host, mut registry, la, lb) = two_lit_players();
        host.remove_externally(lb);
        let mut entities: HashSet<_> = [la, lb].into_iter().collect();

        let removed = VisibilityFilter.redact(&registry, PlayerId(1), &mut entities, &host);
        assert_eq!(removed, 0);
        assert_eq!(entities.len(), 2);

        cleanup(&mut registry, &mut host);
    }

    #[test]
    fn test_redact_all_handles_every_recipient() {
        let (mut host, mut registry, la, lb) = two_lit_players();
        let mut infos = vec![
            TransmitInfo::new(PlayerId(1), [la, lb]),
            TransmitInfo::new(PlayerId(2), [la, lb]),
            TransmitInfo {
                recipient: None,
                entities: [la, lb].into_iter().collect(),
            },
        ];

        let removed = VisibilityFilter.redact_all(&registry, &mut infos, &host);
        assert_eq!(removed, 2);
        assert_eq!(infos[0].entities, HashSet::from([la]));
        assert_eq!(infos[1].entities, HashSet::from([lb]));
        assert_eq!(infos[2].entities.len(), 2);

        cleanup(&mut registry, &mut host);
    }
}
