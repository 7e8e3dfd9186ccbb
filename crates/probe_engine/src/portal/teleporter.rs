//! Portal teleporter
//!
//! Relays collision-start notifications into navigation. The overlap test
//! itself belongs to whatever bounding-box system feeds
//! [`Scene::emit_collision_started`]; the portal only decides whether the
//! other party is the player.

use crate::config::{ConfigError, TeleporterConfig};
use crate::events::{Event, EventType, Subscription};
use crate::portal::navigator::Navigator;
use crate::scene::{tags, Entity, Scene, SceneError};
use std::rc::Rc;

/// Errors when attaching a portal
#[derive(thiserror::Error, Debug)]
pub enum TeleporterError {
    /// Rejected configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The portal entity is not in the scene
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Portal bound to one scene entity
///
/// Every collision start between the portal and an entity tagged
/// [`tags::PLAYER_COLLIDER`] triggers exactly one navigation request. There is
/// no de-duplication: the host is expected to tear the scene down on
/// navigation.
pub struct PortalTeleporter {
    entity: Entity,
    config: TeleporterConfig,
    _subscription: Subscription,
}

impl PortalTeleporter {
    /// Attach a portal to `entity`
    pub fn attach(
        scene: &Scene,
        entity: Entity,
        config: TeleporterConfig,
        navigator: Rc<dyn Navigator>,
    ) -> Result<Self, TeleporterError> {
        config.validate()?;
        if !scene.contains(entity) {
            return Err(SceneError::MissingEntity(entity).into());
        }

        let url = config.url.clone();
        let debug = config.debug;
        let subscription = scene.events().subscribe(
            EventType::CollisionStarted,
            move |event: &Event, scene: &Scene| {
                if event.target != Some(entity) {
                    return false;
                }
                let Some(other) = event.with_entity() else {
                    return false;
                };

                if !scene.has_tag(other, tags::PLAYER_COLLIDER) {
                    if debug {
                        log::debug!(
                            "Portal {} ignoring collision with {}",
                            scene.label(entity),
                            scene.label(other)
                        );
                    }
                    return false;
                }

                if debug {
                    log::debug!("Player {} entered portal {}", scene.label(other), scene.label(entity));
                }
                if let Err(err) = navigator.navigate(&url) {
                    log::error!("Portal {} could not navigate: {}", scene.label(entity), err);
                }
                false
            },
        );

        log::info!("Portal attached to {} -> {}", scene.label(entity), config.url);
        Ok(Self {
            entity,
            config,
            _subscription: subscription,
        })
    }

    /// Stop reacting to collisions
    pub fn detach(self) {
        log::info!("Portal on entity {} detached", self.entity.id());
    }

    /// The portal entity
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Navigation target
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Settings this portal was attached with
    pub fn config(&self) -> &TeleporterConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::logging;
    use crate::portal::navigator::NavigationError;
    use std::cell::RefCell;

    const DESTINATION: &str = "https://example.com/next-room";

    #[derive(Default)]
    struct RecordingNavigator {
        visits: RefCell<Vec<String>>,
        fail: bool,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, url: &str) -> Result<(), NavigationError> {
            self.visits.borrow_mut().push(url.to_string());
            if self.fail {
                return Err(NavigationError::Failed {
                    url: url.to_string(),
                    reason: "host refused".to_string(),
                });
            }
            Ok(())
        }
    }

    struct Fixture {
        scene: Scene,
        portal: Entity,
        player: Entity,
        npc: Entity,
    }

    fn fixture() -> Fixture {
        logging::init_for_tests();
        let mut scene = Scene::new();
        let portal = scene.spawn();
        let player = scene.spawn();
        scene.add_tag(player, tags::PLAYER_COLLIDER).unwrap();
        let npc = scene.spawn();
        Fixture {
            scene,
            portal,
            player,
            npc,
        }
    }

    fn attach(fixture: &Fixture, navigator: &Rc<RecordingNavigator>) -> PortalTeleporter {
        let navigator: Rc<dyn Navigator> = navigator.clone();
        PortalTeleporter::attach(&fixture.scene, fixture.portal, TeleporterConfig::new(DESTINATION), navigator).unwrap()
    }

    #[test]
    fn test_player_collision_navigates_once() {
        let f = fixture();
        let navigator = Rc::new(RecordingNavigator::default());
        let _portal = attach(&f, &navigator);

        f.scene.emit_collision_started(f.portal, f.player);

        assert_eq!(*navigator.visits.borrow(), vec![DESTINATION]);
    }

    #[test]
    fn test_non_player_collision_is_ignored() {
        let f = fixture();
        let navigator = Rc::new(RecordingNavigator::default());
        let _portal = attach(&f, &navigator);

        f.scene.emit_collision_started(f.portal, f.npc);

        assert!(navigator.visits.borrow().is_empty());
    }

    #[test]
    fn test_every_collision_start_navigates_again() {
        let f = fixture();
        let navigator = Rc::new(RecordingNavigator::default());
        let _portal = attach(&f, &navigator);

        f.scene.emit_collision_started(f.portal, f.player);
        f.scene.emit_collision_started(f.portal, f.player);

        assert_eq!(navigator.visits.borrow().len(), 2);
    }

    #[test]
    fn test_collisions_of_other_entities_are_ignored() {
        let f = fixture();
        let navigator = Rc::new(RecordingNavigator::default());
        let _portal = attach(&f, &navigator);

        f.scene.emit_collision_started(f.npc, f.player);

        assert!(navigator.visits.borrow().is_empty());
    }

    #[test]
    fn test_navigation_failure_does_not_propagate() {
        let f = fixture();
        let navigator = Rc::new(RecordingNavigator {
            fail: true,
            ..Default::default()
        });
        let _portal = attach(&f, &navigator);

        f.scene.emit_collision_started(f.portal, f.player);
        f.scene.emit_collision_started(f.portal, f.player);

        // No retries: one attempt per collision
        assert_eq!(navigator.visits.borrow().len(), 2);
    }

    #[test]
    fn test_detached_portal_stops_listening() {
        let f = fixture();
        let navigator = Rc::new(RecordingNavigator::default());
        let portal = attach(&f, &navigator);

        portal.detach();
        f.scene.emit_collision_started(f.portal, f.player);

        assert!(navigator.visits.borrow().is_empty());
        assert_eq!(f.scene.events().handler_count(EventType::CollisionStarted), 0);
    }

    #[test]
    fn test_attach_validates_config_and_entity() {
        let mut f = fixture();
        let navigator: Rc<dyn Navigator> = Rc::new(RecordingNavigator::default());

        assert!(matches!(
            PortalTeleporter::attach(&f.scene, f.portal, TeleporterConfig::new(""), navigator.clone()),
            Err(TeleporterError::Config(_))
        ));

        f.scene.despawn(f.portal).unwrap();
        assert!(matches!(
            PortalTeleporter::attach(&f.scene, f.portal, TeleporterConfig::new(DESTINATION), navigator),
            Err(TeleporterError::Scene(SceneError::MissingEntity(_)))
        ));
    }

    #[test]
    fn test_player_tag_is_checked_at_collision_time() {
        let mut f = fixture();
        let navigator = Rc::new(RecordingNavigator::default());
        let _portal = attach(&f, &navigator);

        f.scene.add_tag(f.npc, tags::PLAYER_COLLIDER).unwrap();
        f.scene.emit_collision_started(f.portal, f.npc);

        assert_eq!(navigator.visits.borrow().len(), 1);
    }
}
