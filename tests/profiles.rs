use assert_matches::assert_matches;
use slant::{
    build, Config, ConfigError, Dispatch, FocusedWindow, Keychord, Profile, Rect, ScreenMetrics,
    Tables, Window, WindowId,
};

fn tables(profile: Profile) -> Tables {
    build(&profile.config()).expect("built-in profile should build")
}

fn chord(spec: &str) -> Keychord {
    spec.parse().expect("valid keychord")
}

fn hd() -> ScreenMetrics {
    ScreenMetrics::new(0.0, 0.0, 1920.0, 1080.0)
}

fn fire(tables: &Tables, spec: &str, screen: &ScreenMetrics) -> (String, Rect) {
    let mut window = Window::new(WindowId(7), "Safari", Rect::new(120.0, 80.0, 1024.0, 768.0));
    match tables.dispatch(&chord(spec), Some(&mut window), screen).unwrap() {
        Dispatch::Applied { operation, frame } => {
            assert_eq!(window.frame(), frame);
            (operation, frame)
        }
        other => panic!("{} did not apply: {:?}", spec, other),
    }
}

#[test]
fn return_fills_the_screen() {
    for profile in Profile::ALL {
        let (operation, frame) = fire(&tables(profile), "return:cmd,shift", &hd());
        assert_eq!(operation, "fullscreen");
        assert_eq!(frame, Rect::new(0.0, 0.0, 1920.0, 1080.0));
    }
}

#[test]
fn eight_is_left_third() {
    let (operation, frame) = fire(&tables(Profile::Extended), "8:cmd,shift", &hd());
    assert_eq!(operation, "pushLeftThird");
    assert_eq!(frame, Rect::new(0.0, 0.0, 640.0, 1080.0));
}

#[test]
fn h_is_top_right_quadrant() {
    let (operation, frame) = fire(&tables(Profile::Extended), "h:cmd,shift", &hd());
    assert_eq!(operation, "pushTopRight");
    assert_eq!(frame, Rect::new(960.0, 0.0, 960.0, 540.0));
}

#[test]
fn extended_geometry() {
    let extended = tables(Profile::Extended);
    let cases = [
        ("left:cmd,shift", "pushLeft", Rect::new(0.0, 0.0, 960.0, 1080.0)),
        ("right:cmd,shift", "pushRight", Rect::new(960.0, 0.0, 960.0, 1080.0)),
        ("up:cmd,shift", "pushTop", Rect::new(0.0, 0.0, 1920.0, 540.0)),
        ("down:cmd,shift", "pushBottom", Rect::new(0.0, 540.0, 1920.0, 540.0)),
        ("9:cmd,shift", "pushCenterThird", Rect::new(640.0, 0.0, 640.0, 1080.0)),
        ("0:cmd,shift", "pushRightThird", Rect::new(1280.0, 0.0, 640.0, 1080.0)),
        ("g:cmd,shift", "pushTopLeft", Rect::new(0.0, 0.0, 960.0, 540.0)),
        ("f:cmd,shift", "pushBottomLeft", Rect::new(0.0, 540.0, 960.0, 540.0)),
        ("j:cmd,shift", "pushBottomRight", Rect::new(960.0, 540.0, 960.0, 540.0)),
    ];
    for (spec, expected_operation, expected_frame) in cases {
        let (operation, frame) = fire(&extended, spec, &hd());
        assert_eq!(operation, expected_operation, "{}", spec);
        assert_eq!(frame, expected_frame, "{}", spec);
    }
}

#[test]
fn basic_leaves_thirds_and_quadrants_unbound() {
    let basic = tables(Profile::Basic);
    for spec in ["8:cmd,shift", "h:cmd,shift", "g:cmd,shift"] {
        let mut window = Window::new(WindowId(1), "Mail", Rect::new(0.0, 0.0, 100.0, 100.0));
        let result = basic.dispatch(&chord(spec), Some(&mut window), &hd()).unwrap();
        assert_eq!(result, Dispatch::Unbound, "{}", spec);
        assert_eq!(window.rect, Rect::new(0.0, 0.0, 100.0, 100.0));
    }
}

#[test]
fn geometry_follows_the_screen() {
    let extended = tables(Profile::Extended);
    let secondary = ScreenMetrics::new(1920.0, 25.0, 2560.0, 1415.0);

    let (_, frame) = fire(&extended, "return:cmd,shift", &secondary);
    assert_eq!(frame, Rect::new(1920.0, 25.0, 2560.0, 1415.0));

    let (_, frame) = fire(&extended, "j:cmd,shift", &secondary);
    assert_eq!(frame, Rect::new(3200.0, 732.5, 1280.0, 707.5));

    let (_, frame) = fire(&extended, "right:cmd,shift", &secondary);
    assert_eq!(frame, Rect::new(3200.0, 25.0, 1280.0, 1415.0));
}

#[test]
fn reapplying_does_not_drift() {
    let extended = tables(Profile::Extended);
    for (chord, _) in extended.bindings().iter() {
        let mut window = Window::new(WindowId(3), "Notes", Rect::new(33.0, 44.0, 555.0, 333.0));
        extended.dispatch(chord, Some(&mut window), &hd()).unwrap();
        let first = window.rect;
        extended.dispatch(chord, Some(&mut window), &hd()).unwrap();
        assert_eq!(window.rect, first, "{}", chord);
    }
}

#[test]
fn no_focused_window_is_a_no_op() {
    let result = tables(Profile::Basic)
        .dispatch(&chord("return:cmd,shift"), None, &hd())
        .unwrap();
    assert_eq!(
        result,
        Dispatch::NoFocusedWindow {
            operation: "fullscreen".to_string()
        }
    );
}

#[test]
fn merging_both_profiles_collides() {
    let mut merged = Profile::Basic.config();
    merged.extend(Profile::Extended.config());
    assert_matches!(
        build(&merged),
        Err(ConfigError::DuplicateBinding { ref keychord, .. }) if keychord == "return:cmd,shift"
    );
}

#[test]
fn profiles_survive_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    for profile in Profile::ALL {
        for file in ["config.toml", "config.yaml"] {
            let path = dir.path().join(profile.name()).join(file);
            profile.config().save(&path).unwrap();

            let loaded = Config::load(&path).unwrap();
            assert_eq!(loaded, profile.config(), "{} {}", profile, file);

            let (_, frame) = fire(&build(&loaded).unwrap(), "return:cmd,shift", &hd());
            assert_eq!(frame, Rect::new(0.0, 0.0, 1920.0, 1080.0));
        }
    }
}
