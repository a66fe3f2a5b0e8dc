mod tests {
    use sputter_animation::math8::{
        blend8, hue8, lerp_percent, map_range, scale8, wrap_degrees,
    };

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 128), 128);
        assert_eq!(scale8(0, 128), 0);
        assert_eq!(scale8(128, 128), 64);
        assert_eq!(scale8(128, 255), 128);
        assert_eq!(scale8(128, 0), 0);
    }

    #[test]
    fn test_blend8() {
        assert_eq!(blend8(255, 128, 128), 191);
        assert_eq!(blend8(0, 128, 255), 128);
        assert_eq!(blend8(255, 0, 128), 127);
        assert_eq!(blend8(255, 128, 0), 255);
    }

    #[test]
    fn test_map_range_truncates() {
        assert_eq!(map_range(0, 0, 85, 0, 255), 0);
        assert_eq!(map_range(40, 0, 85, 0, 255), 120);
        assert_eq!(map_range(85, 0, 85, 0, 255), 255);
        assert_eq!(map_range(200, 171, 255, 255, 0), 167);
        assert_eq!(map_range(255, 171, 255, 255, 0), 0);
    }

    #[test]
    fn test_map_range_empty_input_range() {
        assert_eq!(map_range(7, 3, 3, 10, 20), 10);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0), 0);
        assert_eq!(wrap_degrees(359), 359);
        assert_eq!(wrap_degrees(360), 0);
        assert_eq!(wrap_degrees(720), 0);
        assert_eq!(wrap_degrees(-90), 270);
        assert_eq!(wrap_degrees(-5), 355);
    }

    #[test]
    fn test_hue8() {
        assert_eq!(hue8(0), 0);
        assert_eq!(hue8(120), 85);
        assert_eq!(hue8(180), 127);
        assert_eq!(hue8(360), 0);
        assert_eq!(hue8(-5), 251);
    }

    #[test]
    fn test_lerp_percent() {
        assert_eq!(lerp_percent(6, 1, 0), 6);
        assert_eq!(lerp_percent(6, 1, 50), 4);
        assert_eq!(lerp_percent(6, 1, 100), 1);
        assert_eq!(lerp_percent(50, 950, 50), 500);
        assert_eq!(lerp_percent(18, 6, 200), 6);
    }
}
