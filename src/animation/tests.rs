mod random_walk {
    use crate::anesthetic::AnestheticRegistry;
    use crate::animation::{AnimationError, RandomWalk};
    use crate::config;
    use crate::stage::mechanism_stage;

    fn inside(p: ultraviolet::Vec2, bounds: ([f32; 2], [f32; 2])) -> bool {
        let ([x0, x1], [y0, y1]) = bounds;
        p.x >= x0 && p.x <= x1 && p.y >= y0 && p.y <= y1
    }

    #[test]
    fn seeded_runs_repeat() {
        let benzo = AnestheticRegistry::builtin().get("benzocaina").unwrap();
        let d = mechanism_stage(benzo, 1);
        let a = RandomWalk::new(&d, Some(7)).unwrap().run(50);
        let b = RandomWalk::new(&d, Some(7)).unwrap().run(50);
        assert_eq!(a, b);
    }

    #[test]
    fn particles_are_conserved_and_bounded() {
        let benzo = AnestheticRegistry::builtin().get("benzocaina").unwrap();
        let d = mechanism_stage(benzo, 1);
        let mut walk = RandomWalk::new(&d, Some(42)).unwrap();
        for f in walk.run(300) {
            let total = f.extracellular_ionized.len()
                + f.extracellular_base.len()
                + f.crossing.len()
                + f.intracellular_base.len()
                + f.intracellular_ionized.len();
            assert_eq!(total, 20, "frame {}", f.frame);
            assert_eq!(f.extracellular_ionized.len(), 1);
            assert!(f.crossing.len() <= config::MAX_IN_TRANSIT as usize);
            assert!(f.extracellular_ionized.iter().all(|&p| inside(p, config::EXTRA_IONIZED_BOUNDS)));
            assert!(f.extracellular_base.iter().all(|&p| inside(p, config::EXTRA_BASE_BOUNDS)));
            assert!(f.intracellular_base.iter().all(|&p| inside(p, config::INTRA_BOUNDS)));
        }
    }

    #[test]
    fn base_eventually_reaches_the_cell() {
        let benzo = AnestheticRegistry::builtin().get("benzocaina").unwrap();
        let d = mechanism_stage(benzo, 1);
        let last = RandomWalk::new(&d, Some(1)).unwrap().run(2000).pop().unwrap();
        assert!(last.intracellular_base.len() + last.intracellular_ionized.len() > 0);
    }

    #[test]
    fn procaine_never_crosses() {
        let proc_ = AnestheticRegistry::builtin().get("procaina").unwrap();
        let d = mechanism_stage(proc_, 1);
        let last = RandomWalk::new(&d, Some(3)).unwrap().run(200).pop().unwrap();
        assert!(last.crossing.is_empty());
        assert!(last.intracellular_base.is_empty() && last.intracellular_ionized.is_empty());
    }

    #[test]
    fn bad_sigma_is_rejected() {
        let lido = AnestheticRegistry::builtin().get("lidocaina").unwrap();
        let d = mechanism_stage(lido, 1);
        assert_eq!(
            RandomWalk::with_sigma(&d, Some(0), -1.0).err(),
            Some(AnimationError::InvalidSigma(-1.0))
        );
    }
}

mod jitter {
    use crate::anesthetic::AnestheticRegistry;
    use crate::animation::jitter;
    use crate::stage::mechanism_stage;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn keeps_structure_and_counts() {
        let lido = AnestheticRegistry::builtin().get("lidocaina").unwrap();
        let d = mechanism_stage(lido, 5);
        let mut rng = StdRng::seed_from_u64(11);
        let j = jitter(&d, &mut rng, 0.02).unwrap();
        assert_eq!(j.elements.len(), d.elements.len());
        assert_eq!(j.particles().count(), d.particles().count());
        assert_eq!(j.channel_blocked(), d.channel_blocked());
        assert!(j.particles().all(|p| (0.0..=1.0).contains(&p.pos.x) && (0.0..=1.0).contains(&p.pos.y)));
        assert_ne!(j, d);
    }

    #[test]
    fn zero_sigma_is_identity() {
        let lido = AnestheticRegistry::builtin().get("lidocaina").unwrap();
        let d = mechanism_stage(lido, 3);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(jitter(&d, &mut rng, 0.0).unwrap(), d);
    }
}
