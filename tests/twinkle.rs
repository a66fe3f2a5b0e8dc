mod tests {
    use embassy_time::Duration;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use sputter_animation::PixelFrame;
    use sputter_animation::color::{Harmony, PRIMARY_HUE_SAT};
    use sputter_animation::effect::{
        Effect, HarmonyTwinkleEffect, PrimaryShare, TWINKLE_BASE_BRIGHTNESS, TwinkleEffect,
        TwinkleField, TwinkleReroll, fade_toward, partition_counts,
    };
    use sputter_animation::math8::hue8;

    const FRAME: Duration = Duration::from_millis(50);

    #[test]
    fn test_fade_never_overshoots() {
        assert_eq!(fade_toward(10, 100, 15), 25);
        assert_eq!(fade_toward(95, 100, 15), 100);
        assert_eq!(fade_toward(100, 10, 15), 85);
        assert_eq!(fade_toward(12, 10, 15), 10);
        assert_eq!(fade_toward(250, 255, 15), 255);
        assert_eq!(fade_toward(5, 0, 15), 0);
        assert_eq!(fade_toward(42, 42, 15), 42);
    }

    #[test]
    fn test_field_stays_in_twinkle_range() {
        let mut rng = SmallRng::seed_from_u64(21);
        for reroll in [TwinkleReroll::Uniform, TwinkleReroll::Cubic] {
            let mut field: TwinkleField<50> = TwinkleField::new(8, 15, reroll);
            for _ in 0..300 {
                field.step(&mut rng);
                for channel in 0..4 {
                    for i in 0..50 {
                        assert!(field.brightness(channel, i) >= TWINKLE_BASE_BRIGHTNESS);
                        assert!(field.target(channel, i) >= TWINKLE_BASE_BRIGHTNESS);
                    }
                }
            }
        }
    }

    #[test]
    fn test_plain_twinkle_waits_for_frame_boundary() {
        let mut rng = SmallRng::seed_from_u64(22);
        let mut effect: TwinkleEffect<10> = TwinkleEffect::new(FRAME);
        effect.begin(&mut rng);
        assert!(!effect.update(Duration::from_millis(30), &mut rng));
        assert!(effect.update(Duration::from_millis(30), &mut rng));
        assert!(effect.update(Duration::from_millis(40), &mut rng));
        assert!(!effect.update(Duration::from_millis(10), &mut rng));
    }

    #[test]
    fn test_plain_twinkle_renders_channel_hue() {
        let mut rng = SmallRng::seed_from_u64(23);
        let mut effect: TwinkleEffect<30> = TwinkleEffect::new(FRAME);
        effect.set_channel_hues([0, 0, 0, 0], &mut rng);
        effect.begin(&mut rng);
        let mut frame = PixelFrame::<30>::new();
        for _ in 0..40 {
            effect.update(FRAME, &mut rng);
            effect.render(&mut frame, &mut rng);
        }
        for leds in frame.iter() {
            for led in leds {
                assert!(led.r > 0 && led.r >= led.g && led.r >= led.b, "{led:?}");
            }
        }
    }

    #[test]
    fn test_primary_share_endpoints() {
        let share = PrimaryShare::default();
        assert_eq!(share.permille(0), 50);
        assert_eq!(share.permille(50), 500);
        assert_eq!(share.permille(100), 950);
        assert_eq!(share.permille(255), 950);
        assert_eq!(PrimaryShare::new(20, 80).permille(100), 800);
    }

    #[test]
    fn test_partition_examples() {
        assert_eq!(partition_counts(200, 4, 500), [101, 33, 33, 33]);
        assert_eq!(partition_counts(200, 2, 950), [190, 10, 0, 0]);
        assert_eq!(partition_counts(7, 1, 50), [7, 0, 0, 0]);
        assert_eq!(partition_counts(1, 3, 0), [1, 0, 0, 0]);
    }

    #[test]
    fn test_harmony_twinkle_assigns_on_begin_and_change() {
        let mut rng = SmallRng::seed_from_u64(24);
        let mut effect: HarmonyTwinkleEffect<200> =
            HarmonyTwinkleEffect::new(Harmony::Complementary, PrimaryShare::default(), FRAME);
        effect.set_channel_brightnesses([100; 4], &mut rng);
        effect.begin(&mut rng);
        for channel in 0..4 {
            assert_eq!(effect.primary_count(channel), 190);
        }

        effect.set_channel_brightnesses([0, 100, 100, 100], &mut rng);
        assert_eq!(effect.primary_count(0), 10);
        assert_eq!(effect.primary_count(1), 190);
    }

    #[test]
    fn test_harmony_twinkle_keeps_assignment_without_change() {
        let mut rng = SmallRng::seed_from_u64(25);
        let mut effect: HarmonyTwinkleEffect<64> =
            HarmonyTwinkleEffect::new(Harmony::Triadic, PrimaryShare::default(), FRAME);
        effect.begin(&mut rng);
        let before: Vec<_> = (0..64).map(|i| effect.assignment(2, i)).collect();

        effect.set_channel_hues([0; 4], &mut rng);
        effect.set_channel_brightnesses([100; 4], &mut rng);
        for _ in 0..20 {
            effect.update(FRAME, &mut rng);
        }

        let after: Vec<_> = (0..64).map(|i| effect.assignment(2, i)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_harmony_twinkle_scatters_groups() {
        let mut rng = SmallRng::seed_from_u64(26);
        let mut effect: HarmonyTwinkleEffect<200> =
            HarmonyTwinkleEffect::new(Harmony::Complementary, PrimaryShare::default(), FRAME);
        effect.set_channel_brightnesses([50; 4], &mut rng);
        effect.begin(&mut rng);

        assert_eq!(effect.primary_count(0), 100);
        let leading_primaries = (0..100)
            .filter(|&i| effect.assignment(0, i).1 == PRIMARY_HUE_SAT)
            .count();
        assert!(leading_primaries < 100);
        assert!(leading_primaries > 0);
    }

    #[test]
    fn test_harmony_twinkle_hues_follow_offsets() {
        let mut rng = SmallRng::seed_from_u64(27);
        let mut effect: HarmonyTwinkleEffect<100> =
            HarmonyTwinkleEffect::new(Harmony::Complementary, PrimaryShare::default(), FRAME);
        effect.set_channel_hues([0, 0, 0, 0], &mut rng);
        effect.begin(&mut rng);

        for i in 0..100 {
            let (hue, sat) = effect.assignment(1, i);
            if sat == PRIMARY_HUE_SAT {
                assert!(hue >= hue8(355) || hue <= hue8(5), "primary hue {hue}");
            } else {
                assert_eq!(sat, 255);
                assert!((hue8(175)..=hue8(185)).contains(&hue), "secondary hue {hue}");
            }
        }
    }

    proptest! {
        #[test]
        fn prop_partition_sums_to_len(
            len in 1usize..=200,
            hue_count in 1usize..=4,
            permille in 0u32..=1000,
        ) {
            let counts = partition_counts(len, hue_count, permille);
            prop_assert_eq!(counts.iter().sum::<usize>(), len);

            if hue_count > 1 {
                let rounded = (len * permille as usize + 500) / 1000;
                let secondaries = hue_count - 1;
                let remainder = (len - rounded) % secondaries;
                prop_assert_eq!(counts[0], rounded + remainder);
                for &count in &counts[1..hue_count] {
                    prop_assert_eq!(count, (len - rounded) / secondaries);
                }
            }
            for &count in &counts[hue_count..] {
                prop_assert_eq!(count, 0);
            }
        }
    }
}
