mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use sputter_animation::color::{hsv, hsv2rgb};
    use sputter_animation::markov::{
        BASE_BRIGHTNESS, MAX_BRIGHTNESS, MarkovLayer, PixelWalk, Step, markov_transition,
        markov_transition_brightness_biased,
    };
    use sputter_animation::math8::hue8;

    fn count(
        trials: usize,
        seed: u64,
        mut f: impl FnMut(&mut SmallRng) -> Step,
        want: Step,
    ) -> usize {
        let mut rng = SmallRng::seed_from_u64(seed);
        (0..trials).filter(|_| f(&mut rng) == want).count()
    }

    #[test]
    fn test_transition_has_momentum() {
        let up = count(1000, 11, |rng| markov_transition(Step::Up, rng), Step::Up);
        assert!(up > 500, "only {up} of 1000 kept moving up");
        let down = count(1000, 12, |rng| markov_transition(Step::Down, rng), Step::Down);
        assert!(down > 500, "only {down} of 1000 kept moving down");
    }

    #[test]
    fn test_transition_from_hold_is_uniform() {
        for want in [Step::Down, Step::Hold, Step::Up] {
            let hits = count(1500, 13, |rng| markov_transition(Step::Hold, rng), want);
            assert!((400..=600).contains(&hits), "{want:?} drawn {hits} times");
        }
    }

    #[test]
    fn test_brightness_transition_drifts_up() {
        let up = count(
            1000,
            14,
            |rng| markov_transition_brightness_biased(Step::Hold, rng),
            Step::Up,
        );
        assert!(up > 500, "only {up} of 1000 moved up from hold");

        let keep_down = count(
            1000,
            15,
            |rng| markov_transition_brightness_biased(Step::Down, rng),
            Step::Down,
        );
        assert!(keep_down < 500, "{keep_down} of 1000 kept moving down");
    }

    #[test]
    fn test_new_pixel_starts_at_base() {
        let pixel = PixelWalk::new();
        assert_eq!(pixel.hue_offset(), 0);
        assert_eq!(pixel.base_brightness(), BASE_BRIGHTNESS);
        assert_eq!(pixel.hue_dir(), Step::Hold);
        assert_eq!(pixel.brightness_dir(), Step::Hold);
        assert!(!pixel.is_knocked());
    }

    #[test]
    fn test_knock_renders_dark_for_one_frame() {
        let mut rng = SmallRng::seed_from_u64(99);
        let mut pixel = PixelWalk::new();
        let mut knocks = 0;
        for _ in 0..50_000 {
            pixel.step(&mut rng);
            if pixel.is_knocked() {
                knocks += 1;
                assert_eq!(pixel.brightness(), 0);
                assert_eq!(pixel.base_brightness(), BASE_BRIGHTNESS);
                assert_eq!(pixel.brightness_dir(), Step::Hold);
            } else {
                assert_eq!(pixel.brightness(), pixel.base_brightness());
            }
        }
        assert!(knocks > 0, "the walk never reached the ceiling");
    }

    #[test]
    fn test_layer_reset_and_color() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut layer: MarkovLayer<20> = MarkovLayer::new();
        for _ in 0..100 {
            layer.update(&mut rng);
        }
        layer.reset();
        for channel in 0..4 {
            for i in 0..20 {
                assert_eq!(*layer.pixel(channel, i), PixelWalk::new());
                assert_eq!(
                    layer.color(channel, i, 240),
                    hsv2rgb(hsv(hue8(240), 255, BASE_BRIGHTNESS))
                );
            }
        }
    }

    proptest! {
        #[test]
        fn prop_walk_stays_in_bounds(seed in any::<u64>(), steps in 1usize..3000) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut pixel = PixelWalk::new();
            for _ in 0..steps {
                pixel.step(&mut rng);
                prop_assert!((-5..=5).contains(&pixel.hue_offset()));
                prop_assert!(
                    (BASE_BRIGHTNESS..=MAX_BRIGHTNESS).contains(&pixel.base_brightness())
                );
            }
        }

        #[test]
        fn prop_layer_stays_in_bounds(seed in any::<u64>(), frames in 1usize..200) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut layer: MarkovLayer<12> = MarkovLayer::new();
            for _ in 0..frames {
                layer.update(&mut rng);
                for channel in 0..4 {
                    for i in 0..12 {
                        let pixel = layer.pixel(channel, i);
                        prop_assert!((-5..=5).contains(&pixel.hue_offset()));
                        prop_assert!(
                            (BASE_BRIGHTNESS..=MAX_BRIGHTNESS).contains(&pixel.base_brightness())
                        );
                    }
                }
            }
        }
    }
}
