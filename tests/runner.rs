mod tests {
    use embassy_time::Duration;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use sputter_animation::PixelFrame;
    use sputter_animation::color::{ActorPalette, Harmony, Rgb};
    use sputter_animation::effect::{
        Effect, MAX_RUNNERS, RUNNER_LENGTH, RUNNER_SLOTS, RunnerEffect, max_runners,
    };

    const FRAME: Duration = Duration::from_millis(50);
    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    fn runner_effect<const N: usize>(palette: ActorPalette, brightness: u8) -> (RunnerEffect<N>, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(31);
        let mut effect = RunnerEffect::new(palette, FRAME);
        effect.set_channel_hues([0, 90, 180, 270], &mut rng);
        effect.set_channel_brightnesses([brightness; 4], &mut rng);
        effect.begin(&mut rng);
        (effect, rng)
    }

    #[test]
    fn test_max_runners_falls_with_brightness() {
        assert_eq!(max_runners(0), MAX_RUNNERS);
        assert_eq!(max_runners(20), 5);
        assert_eq!(max_runners(50), 4);
        assert_eq!(max_runners(100), 1);
    }

    #[test]
    fn test_runner_count_never_exceeds_pool() {
        let (mut effect, mut rng) =
            runner_effect::<200>(ActorPalette::Harmony(Harmony::Complementary), 0);
        let mut seen_any = false;
        for tick in 0..1500 {
            assert!(effect.update(FRAME, &mut rng));
            for channel in 0..4 {
                let active = effect.active_runners(channel);
                assert!(active <= RUNNER_SLOTS);
                if tick >= 500 {
                    assert!(active <= max_runners(0));
                }
                seen_any |= active > 0;
            }
        }
        assert!(seen_any);
    }

    #[test]
    fn test_bright_strip_runs_one_runner_at_a_time() {
        let (mut effect, mut rng) =
            runner_effect::<60>(ActorPalette::Harmony(Harmony::Triadic), 100);
        for _ in 0..800 {
            effect.update(FRAME, &mut rng);
            for channel in 0..4 {
                assert!(effect.active_runners(channel) <= 1);
            }
        }
    }

    #[test]
    fn test_runners_enter_one_window_apart() {
        let (mut effect, mut rng) =
            runner_effect::<120>(ActorPalette::Harmony(Harmony::Square), 0);
        let window = i16::try_from(RUNNER_LENGTH).unwrap();
        for _ in 0..1000 {
            effect.update(FRAME, &mut rng);
            for channel in 0..4 {
                let heads: Vec<i16> = effect.runners(channel).map(|runner| runner.head()).collect();
                let at_start = heads.iter().filter(|&&head| head < window).count();
                assert!(at_start <= 1, "heads {heads:?}");
                for (a, &first) in heads.iter().enumerate() {
                    for &second in &heads[a + 1..] {
                        assert!((first - second).abs() >= window, "heads {heads:?}");
                    }
                }
                assert!(heads.iter().all(|&head| head < 120 + window));
            }
        }
    }

    #[test]
    fn test_uncovered_pixels_show_base_layer() {
        let (mut effect, mut rng) =
            runner_effect::<80>(ActorPalette::Harmony(Harmony::SplitComplementary), 0);
        let hues = [0, 90, 180, 270];
        let mut frame = PixelFrame::<80>::new();
        for _ in 0..300 {
            effect.update(FRAME, &mut rng);
        }
        effect.render(&mut frame, &mut rng);

        for (channel, leds) in frame.iter().enumerate() {
            for (i, led) in leds.iter().enumerate() {
                let pixel = i16::try_from(i).unwrap();
                let covered = effect
                    .runners(channel)
                    .any(|runner| runner.window_index(pixel).is_some());
                if !covered {
                    assert_eq!(*led, effect.base_layer().color(channel, i, hues[channel]));
                }
            }
        }
    }

    #[test]
    fn test_monochromatic_runners_are_black_or_white() {
        let (mut effect, mut rng) = runner_effect::<100>(ActorPalette::BlackOrWhite, 0);
        let mut colors = 0;
        for _ in 0..600 {
            effect.update(FRAME, &mut rng);
            for channel in 0..4 {
                for runner in effect.runners(channel) {
                    assert!(runner.color() == WHITE || runner.color() == BLACK);
                    colors += 1;
                }
            }
        }
        assert!(colors > 0);
        assert_eq!(effect.name(), "Monochromatic Runner");
    }

    #[test]
    fn test_reset_clears_runners() {
        let (mut effect, mut rng) =
            runner_effect::<100>(ActorPalette::Harmony(Harmony::Triadic), 0);
        for _ in 0..300 {
            effect.update(FRAME, &mut rng);
        }
        effect.reset();
        for channel in 0..4 {
            assert_eq!(effect.active_runners(channel), 0);
        }
    }
}
